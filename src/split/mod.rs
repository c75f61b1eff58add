//! Turning one group transaction into pairwise debt relations.
//!
//! Every divider's share is computed by the transaction's [`SplitMethod`]
//! and then spread evenly over the payers. A payer never owes themselves.
//!
//! Invalid weights (percentages not summing to 100, zero total shares, exact
//! amounts that don't add up, ...) are not errors: the calculator returns an
//! empty list, meaning nothing should be persisted. Structural problems that
//! would otherwise divide by zero are rejected with [`SplitError`].

mod methods;

use crate::core::debt::DebtRelation;
use crate::core::transaction::{SplitMethod, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transactions that cannot be split at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("transaction has no payers")]
    NoPayers,
    #[error("transaction has no dividers")]
    NoDividers,
    #[error("transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
}

/// Tunables for the split calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Round each relation to this many decimal places. `None` keeps exact
    /// decimals.
    #[serde(default)]
    pub decimal_places: Option<u32>,
}

/// Computes debt relations for transactions.
///
/// # Examples
///
/// ```
/// use divvy_engine::core::transaction::{SplitMethod, Transaction};
/// use divvy_engine::core::user::UserId;
/// use divvy_engine::split::SplitCalculator;
/// use rust_decimal_macros::dec;
///
/// let tx = Transaction::new(
///     dec!(100),
///     vec![UserId::new("carol")],
///     vec![UserId::new("alice"), UserId::new("bob")],
///     SplitMethod::Equal,
/// );
///
/// let debts = SplitCalculator::default().compute(&tx).unwrap();
/// assert_eq!(debts.len(), 2);
/// assert!(debts.iter().all(|d| d.amount() == dec!(50)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SplitCalculator {
    config: SplitConfig,
}

impl SplitCalculator {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Compute the debt relations for one transaction.
    pub fn compute(&self, tx: &Transaction) -> Result<Vec<DebtRelation>, SplitError> {
        let payers = tx.payers();
        let dividers = tx.dividers();
        if payers.is_empty() {
            return Err(SplitError::NoPayers);
        }
        if dividers.is_empty() {
            return Err(SplitError::NoDividers);
        }
        if tx.amount() <= Decimal::ZERO {
            return Err(SplitError::NonPositiveAmount(tx.amount()));
        }

        let amount = tx.amount();
        let shares = match tx.split() {
            SplitMethod::Equal => Some(methods::equal(amount, &dividers)),
            SplitMethod::Percentage(w) => methods::percentage(amount, &dividers, &payers, w),
            SplitMethod::Adjustment(w) => methods::adjustment(amount, &dividers, w),
            SplitMethod::ExactAmount(w) => methods::exact_amount(amount, &dividers, w),
            SplitMethod::Shares(w) => methods::shares(amount, &dividers, w),
        };
        let Some(shares) = shares else {
            log::warn!(
                "transaction {} ({} split) has invalid weights, no debts computed",
                tx.id(),
                tx.split().name()
            );
            return Ok(Vec::new());
        };

        let payer_count = Decimal::from(payers.len());
        let mut relations = Vec::new();
        for (divider, share) in shares {
            if share <= Decimal::ZERO {
                continue;
            }
            let per_payer = self.round(share / payer_count);
            if per_payer <= Decimal::ZERO {
                continue;
            }
            for payer in payers.iter().filter(|p| **p != divider) {
                relations.push(
                    DebtRelation::new(divider.clone(), payer.clone(), per_payer)
                        .with_transaction(tx.id()),
                );
            }
        }

        log::debug!(
            "transaction {} ({} split of {}) produced {} debt relation(s)",
            tx.id(),
            tx.split().name(),
            amount,
            relations.len()
        );
        Ok(relations)
    }

    /// Compute relations for many transactions, skipping (and logging) the
    /// ones that cannot be split.
    pub fn compute_all<'a>(
        &self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Vec<DebtRelation> {
        let mut all = Vec::new();
        for tx in transactions {
            match self.compute(tx) {
                Ok(relations) => all.extend(relations),
                Err(e) => log::warn!("skipping transaction {}: {}", tx.id(), e),
            }
        }
        all
    }

    fn round(&self, value: Decimal) -> Decimal {
        match self.config.decimal_places {
            Some(dp) => value.round_dp(dp),
            None => value,
        }
    }
}
