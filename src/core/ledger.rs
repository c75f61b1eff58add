use crate::core::debt::DebtRelation;
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tracks the net position of each user across all of their debts.
///
/// A positive balance means the user is owed (net creditor).
/// A negative balance means the user owes (net debtor).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    positions: HashMap<UserId, Decimal>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from a list of relations.
    pub fn from_relations<'a>(relations: impl IntoIterator<Item = &'a DebtRelation>) -> Self {
        let mut ledger = Self::new();
        for relation in relations {
            ledger.apply_debt(relation);
        }
        ledger
    }

    /// Apply a debt: the debtor loses, the creditor gains.
    pub fn apply_debt(&mut self, debt: &DebtRelation) {
        self.transfer(debt.from(), debt.to(), debt.amount());
    }

    /// Move `amount` of position from `from` to `to`.
    pub fn transfer(&mut self, from: &UserId, to: &UserId, amount: Decimal) {
        *self.positions.entry(from.clone()).or_insert(Decimal::ZERO) -= amount;
        *self.positions.entry(to.clone()).or_insert(Decimal::ZERO) += amount;
    }

    /// Net position of a user.
    pub fn position(&self, user: &UserId) -> Decimal {
        self.positions.get(user).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn positions(&self) -> &HashMap<UserId, Decimal> {
        &self.positions
    }

    /// Verify that the ledger is balanced: sum of all positions = 0.
    pub fn is_balanced(&self) -> bool {
        self.positions.values().sum::<Decimal>() == Decimal::ZERO
    }

    /// True when every user is flat.
    pub fn is_settled(&self) -> bool {
        self.positions.values().all(|v| v.is_zero())
    }

    /// Sum of positive positions: what actually has to change hands.
    pub fn total_outstanding(&self) -> Decimal {
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }

    /// Net creditors, largest first (ties broken by id).
    pub fn creditors(&self) -> Vec<(UserId, Decimal)> {
        self.sorted_where(|v| v > Decimal::ZERO)
    }

    /// Net debtors with the amount they owe, largest first (ties broken by id).
    pub fn debtors(&self) -> Vec<(UserId, Decimal)> {
        self.sorted_where(|v| v < Decimal::ZERO)
            .into_iter()
            .map(|(user, v)| (user, v.abs()))
            .collect()
    }

    fn sorted_where(&self, keep: impl Fn(Decimal) -> bool) -> Vec<(UserId, Decimal)> {
        let mut out: Vec<(UserId, Decimal)> = self
            .positions
            .iter()
            .filter(|(_, v)| keep(**v))
            .map(|(u, v)| (u.clone(), *v))
            .collect();
        out.sort_by(|a, b| b.1.abs().cmp(&a.1.abs()).then_with(|| a.0.cmp(&b.0)));
        out
    }
}
