//! Random group expense generation for benchmarks and property checks.

use crate::core::transaction::{SplitMethod, Transaction};
use crate::core::user::UserId;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// Configuration for generating a random group history.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub user_count: usize,
    pub transaction_count: usize,
    /// Minimum transaction amount, in cents.
    pub min_cents: u64,
    /// Maximum transaction amount, in cents.
    pub max_cents: u64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            user_count: 6,
            transaction_count: 30,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

/// Generate random transactions using every split method, always with
/// weights that are valid for the chosen dividers.
pub fn generate_random_group(config: &GroupConfig) -> Vec<Transaction> {
    let mut rng = rand::thread_rng();
    let users: Vec<UserId> = (0..config.user_count.max(1))
        .map(|i| UserId::new(format!("user-{:03}", i)))
        .collect();
    let min_cents = config.min_cents.max(1);
    let max_cents = config.max_cents.max(min_cents);

    (0..config.transaction_count)
        .map(|_| {
            let cents = rng.gen_range(min_cents..=max_cents);
            let amount = Decimal::from_i128_with_scale(i128::from(cents), 2);

            let payer_count = rng.gen_range(1..=users.len().min(2));
            let divider_count = rng.gen_range(1..=users.len());
            let payers: Vec<UserId> = users
                .choose_multiple(&mut rng, payer_count)
                .cloned()
                .collect();
            let dividers: Vec<UserId> = users
                .choose_multiple(&mut rng, divider_count)
                .cloned()
                .collect();

            let split = random_split(&mut rng, amount, &dividers);
            Transaction::new(amount, payers, dividers, split)
        })
        .collect()
}

fn random_split(rng: &mut impl Rng, amount: Decimal, dividers: &[UserId]) -> SplitMethod {
    match rng.gen_range(0..5) {
        0 => SplitMethod::Equal,
        1 => {
            // Whole percentages; the last divider takes the remainder.
            let mut left = 100u32;
            let mut weights = BTreeMap::new();
            for (i, d) in dividers.iter().enumerate() {
                let pct = if i + 1 == dividers.len() {
                    left
                } else {
                    rng.gen_range(0..=left)
                };
                left -= pct;
                weights.insert(d.clone(), Decimal::from(pct));
            }
            SplitMethod::Percentage(weights)
        }
        2 => {
            let mut adjustments = BTreeMap::new();
            if let Some(d) = dividers.first() {
                adjustments.insert(
                    d.clone(),
                    (amount / Decimal::from(4)).round_dp_with_strategy(2, RoundingStrategy::ToZero),
                );
            }
            SplitMethod::Adjustment(adjustments)
        }
        3 => {
            let each = (amount / Decimal::from(dividers.len()))
                .round_dp_with_strategy(2, RoundingStrategy::ToZero);
            let mut amounts: BTreeMap<UserId, Decimal> =
                dividers.iter().map(|d| (d.clone(), each)).collect();
            if let Some(last) = dividers.last() {
                let rest = each * Decimal::from(dividers.len() - 1);
                amounts.insert(last.clone(), amount - rest);
            }
            SplitMethod::ExactAmount(amounts)
        }
        _ => SplitMethod::Shares(
            dividers
                .iter()
                .map(|d| (d.clone(), rng.gen_range(1..=4)))
                .collect(),
        ),
    }
}
