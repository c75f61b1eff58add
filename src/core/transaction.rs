use crate::core::user::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// How a transaction's amount is divided among its dividers.
///
/// Serialized as `{"method": "percentage", "weights": {"alice": "60", ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "weights", rename_all = "snake_case")]
pub enum SplitMethod {
    /// Every divider carries the same share.
    Equal,
    /// Per-user percentages, which must sum to exactly 100.
    Percentage(BTreeMap<UserId, Decimal>),
    /// Fixed per-user amounts added on top of an even split of the remainder.
    Adjustment(BTreeMap<UserId, Decimal>),
    /// Per-user stated amounts, which must sum to the transaction amount.
    ExactAmount(BTreeMap<UserId, Decimal>),
    /// Integer share counts.
    Shares(BTreeMap<UserId, u32>),
}

impl SplitMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SplitMethod::Equal => "equal",
            SplitMethod::Percentage(_) => "percentage",
            SplitMethod::Adjustment(_) => "adjustment",
            SplitMethod::ExactAmount(_) => "exact_amount",
            SplitMethod::Shares(_) => "shares",
        }
    }
}

/// A shared expense: someone fronted `amount` for a group of dividers.
///
/// # Examples
///
/// ```
/// use divvy_engine::core::transaction::{SplitMethod, Transaction};
/// use divvy_engine::core::user::UserId;
/// use rust_decimal_macros::dec;
///
/// let dinner = Transaction::new(
///     dec!(90),
///     vec![UserId::new("alice")],
///     vec![UserId::new("alice"), UserId::new("bob"), UserId::new("carol")],
///     SplitMethod::Equal,
/// )
/// .with_description("Dinner");
///
/// assert_eq!(dinner.dividers().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default)]
    description: String,
    amount: Decimal,
    payers: Vec<UserId>,
    dividers: Vec<UserId>,
    split: SplitMethod,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        amount: Decimal,
        payers: Vec<UserId>,
        dividers: Vec<UserId>,
        split: SplitMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            amount,
            payers,
            dividers,
            split,
            created_at: Utc::now(),
        }
    }

    /// Use a specific ID (useful for testing / determinism).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Payers in input order, duplicates removed.
    pub fn payers(&self) -> Vec<UserId> {
        unique(&self.payers)
    }

    /// Dividers in input order, duplicates removed.
    pub fn dividers(&self) -> Vec<UserId> {
        unique(&self.dividers)
    }

    pub fn split(&self) -> &SplitMethod {
        &self.split
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_payer(&self, user: &UserId) -> bool {
        self.payers.contains(user)
    }
}

fn unique(users: &[UserId]) -> Vec<UserId> {
    let mut seen = Vec::with_capacity(users.len());
    for user in users {
        if !seen.contains(user) {
            seen.push(user.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_duplicate_participants_count_once() {
        let a = UserId::new("A");
        let b = UserId::new("B");
        let tx = Transaction::new(
            dec!(10),
            vec![a.clone(), a.clone()],
            vec![b.clone(), a.clone(), b.clone()],
            SplitMethod::Equal,
        );
        assert_eq!(tx.payers(), vec![a.clone()]);
        assert_eq!(tx.dividers(), vec![b, a]);
    }

    #[test]
    fn test_split_method_json_shape() {
        let mut weights = BTreeMap::new();
        weights.insert(UserId::new("A"), dec!(60));
        weights.insert(UserId::new("B"), dec!(40));
        let json = serde_json::to_value(SplitMethod::Percentage(weights)).unwrap();

        assert_eq!(json["method"], "percentage");
        assert_eq!(json["weights"]["A"], "60");
    }

    #[test]
    fn test_transaction_parses_with_defaults() {
        let json = r#"{
            "amount": "100",
            "payers": ["C"],
            "dividers": ["A", "B"],
            "split": { "method": "shares", "weights": { "A": 1, "B": 3 } }
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.amount(), dec!(100));
        assert_eq!(tx.split().name(), "shares");
        assert!(tx.description().is_empty());
    }

    #[test]
    fn test_equal_split_json_has_no_weights() {
        let json = r#"{ "amount": "5", "payers": ["A"], "dividers": ["B"], "split": { "method": "equal" } }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.split(), &SplitMethod::Equal);
    }
}
