use crate::core::user::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when building a debt relation from untrusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebtError {
    #[error("debt amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("user {0} cannot owe themselves")]
    SelfDebt(UserId),
}

/// A directed debt between two users: `from` owes `to` a positive `amount`.
///
/// Relations are created per payer/divider pair of a transaction and are
/// never mutated afterwards. Settling a pair deletes its relations.
///
/// # Examples
///
/// ```
/// use divvy_engine::core::debt::DebtRelation;
/// use divvy_engine::core::user::UserId;
/// use rust_decimal_macros::dec;
///
/// let debt = DebtRelation::new(UserId::new("alice"), UserId::new("bob"), dec!(12.50));
///
/// assert_eq!(debt.from().as_str(), "alice");
/// assert_eq!(debt.amount(), dec!(12.50));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDebtRelation")]
pub struct DebtRelation {
    id: Uuid,
    /// The user who owes.
    from: UserId,
    /// The user who is owed.
    to: UserId,
    amount: Decimal,
    /// Transaction this relation was computed from, if any.
    transaction_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

/// Wire shape of a [`DebtRelation`], checked by `try_new` on the way in.
#[derive(Deserialize)]
struct RawDebtRelation {
    id: Uuid,
    from: UserId,
    to: UserId,
    amount: Decimal,
    #[serde(default)]
    transaction_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RawDebtRelation> for DebtRelation {
    type Error = DebtError;

    fn try_from(raw: RawDebtRelation) -> Result<Self, Self::Error> {
        let mut relation = Self::try_new(raw.from, raw.to, raw.amount)?;
        relation.id = raw.id;
        relation.transaction_id = raw.transaction_id;
        relation.created_at = raw.created_at;
        Ok(relation)
    }
}

impl DebtRelation {
    /// Create a new debt relation.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or if `from == to`.
    pub fn new(from: UserId, to: UserId, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Debt amount must be positive, got {}",
            amount
        );
        assert!(from != to, "User {} cannot owe themselves", from);
        Self::build(from, to, amount)
    }

    /// Fallible constructor for relations read from external input.
    pub fn try_new(from: UserId, to: UserId, amount: Decimal) -> Result<Self, DebtError> {
        if amount <= Decimal::ZERO {
            return Err(DebtError::NonPositiveAmount(amount));
        }
        if from == to {
            return Err(DebtError::SelfDebt(from));
        }
        Ok(Self::build(from, to, amount))
    }

    fn build(from: UserId, to: UserId, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            transaction_id: None,
            created_at: Utc::now(),
        }
    }

    /// Tag the relation with the transaction it came from.
    pub fn with_transaction(mut self, transaction_id: Uuid) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn from(&self) -> &UserId {
        &self.from
    }

    pub fn to(&self) -> &UserId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn transaction_id(&self) -> Option<Uuid> {
        self.transaction_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True if this relation connects `a` and `b`, in either direction.
    pub fn connects(&self, a: &UserId, b: &UserId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }
}

/// An ordered collection of debt relations, typically everything a group
/// currently owes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtSet {
    relations: Vec<DebtRelation>,
}

impl DebtSet {
    pub fn new() -> Self {
        Self {
            relations: Vec::new(),
        }
    }

    pub fn add(&mut self, relation: DebtRelation) {
        self.relations.push(relation);
    }

    pub fn relations(&self) -> &[DebtRelation] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Total gross value of all relations.
    pub fn gross_total(&self) -> Decimal {
        self.relations.iter().map(|r| r.amount()).sum()
    }

    /// All unique users referenced in this set, sorted.
    pub fn users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .relations
            .iter()
            .flat_map(|r| [r.from().clone(), r.to().clone()])
            .collect();
        users.sort();
        users.dedup();
        users
    }

    /// Relations between two users, in either direction.
    pub fn between(&self, a: &UserId, b: &UserId) -> Vec<&DebtRelation> {
        self.relations.iter().filter(|r| r.connects(a, b)).collect()
    }

    /// Settle everything between two users: the connecting relations are
    /// removed from the set and returned.
    pub fn settle_between(&mut self, a: &UserId, b: &UserId) -> Vec<DebtRelation> {
        let (settled, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.relations)
            .into_iter()
            .partition(|r| r.connects(a, b));
        self.relations = kept;
        log::debug!(
            "settled {} relation(s) between {} and {}",
            settled.len(),
            a,
            b
        );
        settled
    }

    /// Remove every relation computed from the given transaction.
    pub fn remove_transaction(&mut self, transaction_id: Uuid) -> Vec<DebtRelation> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.relations)
            .into_iter()
            .partition(|r| r.transaction_id() == Some(transaction_id));
        self.relations = kept;
        removed
    }
}

impl FromIterator<DebtRelation> for DebtSet {
    fn from_iter<T: IntoIterator<Item = DebtRelation>>(iter: T) -> Self {
        Self {
            relations: iter.into_iter().collect(),
        }
    }
}

impl Extend<DebtRelation> for DebtSet {
    fn extend<T: IntoIterator<Item = DebtRelation>>(&mut self, iter: T) {
        self.relations.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn debt(from: &str, to: &str, amount: Decimal) -> DebtRelation {
        DebtRelation::new(UserId::new(from), UserId::new(to), amount)
    }

    #[test]
    fn test_debt_creation() {
        let d = debt("A", "B", dec!(1000));
        assert_eq!(d.from().as_str(), "A");
        assert_eq!(d.to().as_str(), "B");
        assert_eq!(d.amount(), dec!(1000));
        assert_eq!(d.transaction_id(), None);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_debt_zero_amount() {
        debt("A", "B", Decimal::ZERO);
    }

    #[test]
    #[should_panic(expected = "cannot owe themselves")]
    fn test_debt_to_self() {
        debt("A", "A", dec!(10));
    }

    #[test]
    fn test_try_new_rejects_bad_input() {
        assert_eq!(
            DebtRelation::try_new(UserId::new("A"), UserId::new("B"), dec!(-5)),
            Err(DebtError::NonPositiveAmount(dec!(-5)))
        );
        assert_eq!(
            DebtRelation::try_new(UserId::new("A"), UserId::new("A"), dec!(5)),
            Err(DebtError::SelfDebt(UserId::new("A")))
        );
    }

    #[test]
    fn test_debt_set_gross_and_users() {
        let set: DebtSet = vec![debt("A", "B", dec!(100)), debt("C", "B", dec!(200))]
            .into_iter()
            .collect();
        assert_eq!(set.gross_total(), dec!(300));
        assert_eq!(
            set.users(),
            vec![UserId::new("A"), UserId::new("B"), UserId::new("C")]
        );
    }

    #[test]
    fn test_settle_between_removes_both_directions() {
        let mut set = DebtSet::new();
        set.add(debt("A", "B", dec!(30)));
        set.add(debt("B", "A", dec!(10)));
        set.add(debt("A", "C", dec!(5)));

        let settled = set.settle_between(&UserId::new("B"), &UserId::new("A"));
        assert_eq!(settled.len(), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.relations()[0].to().as_str(), "C");
    }

    #[test]
    fn test_remove_transaction() {
        let tx = Uuid::new_v4();
        let mut set = DebtSet::new();
        set.add(debt("A", "B", dec!(30)).with_transaction(tx));
        set.add(debt("C", "B", dec!(30)).with_transaction(tx));
        set.add(debt("A", "C", dec!(5)));

        let removed = set.remove_transaction(tx);
        assert_eq!(removed.len(), 2);
        assert_eq!(set.len(), 1);
        assert!(set.between(&UserId::new("A"), &UserId::new("B")).is_empty());
    }

    fn relation_json(from: &str, to: &str, amount: &str) -> String {
        format!(
            r#"{{"id":"{}","from":"{}","to":"{}","amount":"{}","created_at":"2024-01-01T00:00:00Z"}}"#,
            Uuid::new_v4(),
            from,
            to,
            amount
        )
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let ok: DebtRelation = serde_json::from_str(&relation_json("A", "B", "5")).unwrap();
        assert_eq!(ok.amount(), dec!(5));
        assert_eq!(ok.transaction_id(), None);

        assert!(serde_json::from_str::<DebtRelation>(&relation_json("A", "A", "5")).is_err());
        assert!(serde_json::from_str::<DebtRelation>(&relation_json("A", "B", "-5")).is_err());
        assert!(serde_json::from_str::<DebtRelation>(&relation_json("A", "B", "0")).is_err());
    }

    #[test]
    fn test_deserialize_round_trip_keeps_identity() {
        let tx = Uuid::new_v4();
        let original = debt("A", "B", dec!(12.50)).with_transaction(tx);
        let json = serde_json::to_string(&original).unwrap();
        let back: DebtRelation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_debt_set_rejects_self_debt_rows() {
        let json = format!(r#"{{"relations":[{}]}}"#, relation_json("A", "A", "5"));
        assert!(serde_json::from_str::<DebtSet>(&json).is_err());
    }
}
