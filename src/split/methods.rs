//! Per-method share computation.
//!
//! Each function returns the total owed by every divider (before that total
//! is spread over the payers), or `None` when the method's weights are
//! unusable for this transaction. Arithmetic is checked: an amount large
//! enough to overflow a `Decimal` makes the weights unusable too.

use crate::core::user::UserId;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// What one divider owes in total for a transaction.
pub(crate) type Share = (UserId, Decimal);

pub(crate) fn equal(amount: Decimal, dividers: &[UserId]) -> Vec<Share> {
    let each = amount / Decimal::from(dividers.len());
    dividers.iter().map(|d| (d.clone(), each)).collect()
}

/// Payers are left out entirely: only non-paying dividers owe their
/// percentage.
pub(crate) fn percentage(
    amount: Decimal,
    dividers: &[UserId],
    payers: &[UserId],
    weights: &BTreeMap<UserId, Decimal>,
) -> Option<Vec<Share>> {
    if !keys_are_dividers(weights, dividers) {
        return None;
    }
    if weights.values().any(|w| *w < Decimal::ZERO) {
        return None;
    }
    let total = checked_sum(weights.values())?;
    if total != Decimal::ONE_HUNDRED {
        log::warn!("percentage weights sum to {}, expected 100", total);
        return None;
    }

    dividers
        .iter()
        .filter(|d| !payers.contains(d))
        .map(|d| {
            let pct = weights.get(d).copied().unwrap_or(Decimal::ZERO);
            let scaled = amount.checked_mul(pct).or_else(|| overflowed(amount))?;
            Some((d.clone(), scaled / Decimal::ONE_HUNDRED))
        })
        .collect()
}

pub(crate) fn adjustment(
    amount: Decimal,
    dividers: &[UserId],
    adjustments: &BTreeMap<UserId, Decimal>,
) -> Option<Vec<Share>> {
    if !keys_are_dividers(adjustments, dividers) {
        return None;
    }
    let adjusted = checked_sum(adjustments.values())?;
    let remainder = amount.checked_sub(adjusted).or_else(|| overflowed(amount))?;
    let even = remainder / Decimal::from(dividers.len());

    let shares: Vec<Share> = dividers
        .iter()
        .map(|d| {
            let extra = adjustments.get(d).copied().unwrap_or(Decimal::ZERO);
            let share = even.checked_add(extra).or_else(|| overflowed(amount))?;
            Some((d.clone(), share))
        })
        .collect::<Option<_>>()?;

    if let Some((user, share)) = shares.iter().find(|(_, s)| *s < Decimal::ZERO) {
        log::warn!("adjustment leaves {} with a negative share of {}", user, share);
        return None;
    }
    Some(shares)
}

pub(crate) fn exact_amount(
    amount: Decimal,
    dividers: &[UserId],
    amounts: &BTreeMap<UserId, Decimal>,
) -> Option<Vec<Share>> {
    if !keys_are_dividers(amounts, dividers) {
        return None;
    }
    if amounts.values().any(|a| *a < Decimal::ZERO) {
        return None;
    }
    let stated = checked_sum(amounts.values())?;
    if stated != amount {
        log::warn!("exact amounts sum to {}, transaction is {}", stated, amount);
        return None;
    }

    Some(
        dividers
            .iter()
            .map(|d| (d.clone(), amounts.get(d).copied().unwrap_or(Decimal::ZERO)))
            .collect(),
    )
}

pub(crate) fn shares(
    amount: Decimal,
    dividers: &[UserId],
    counts: &BTreeMap<UserId, u32>,
) -> Option<Vec<Share>> {
    if !keys_are_dividers(counts, dividers) {
        return None;
    }
    let total: u64 = counts.values().map(|c| u64::from(*c)).sum();
    if total == 0 {
        log::warn!("share counts sum to zero");
        return None;
    }
    let total = Decimal::from(total);

    dividers
        .iter()
        .map(|d| {
            let count = Decimal::from(counts.get(d).copied().unwrap_or(0));
            let scaled = amount.checked_mul(count).or_else(|| overflowed(amount))?;
            Some((d.clone(), scaled / total))
        })
        .collect()
}

fn keys_are_dividers<V>(weights: &BTreeMap<UserId, V>, dividers: &[UserId]) -> bool {
    match weights.keys().find(|user| !dividers.contains(user)) {
        Some(stranger) => {
            log::warn!("split weight given for {} who is not a divider", stranger);
            false
        }
        None => true,
    }
}

fn checked_sum<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> Option<Decimal> {
    let total = values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v));
    if total.is_none() {
        log::warn!("split weights overflow when summed");
    }
    total
}

fn overflowed(amount: Decimal) -> Option<Decimal> {
    log::warn!("splitting {} overflows a decimal", amount);
    None
}
