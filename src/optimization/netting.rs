use crate::core::debt::{DebtRelation, DebtSet};
use crate::core::user::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single directed balance between two users after netting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NetDebt {
    pub from: UserId,
    pub to: UserId,
    pub amount: Decimal,
}

impl NetDebt {
    /// Materialize as a fresh debt relation, ready to be persisted.
    pub fn to_relation(&self) -> DebtRelation {
        DebtRelation::new(self.from.clone(), self.to.clone(), self.amount)
    }
}

/// Result of netting the debts between two specific users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BilateralNettingResult {
    pub user_a: UserId,
    pub user_b: UserId,
    /// Gross amount A owes B.
    pub gross_a_to_b: Decimal,
    /// Gross amount B owes A.
    pub gross_b_to_a: Decimal,
    /// Net amount: positive means A owes B net, negative means B owes A net.
    pub net_amount: Decimal,
    /// Amount that no longer needs to change hands.
    pub savings: Decimal,
}

/// Result of pairwise netting across a whole set of relations.
///
/// Balances are keyed by the canonical pair `(smaller id, larger id)`; a
/// positive value means the first user owes the second.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NettingResult {
    #[serde(with = "pair_map_serde")]
    balances: BTreeMap<(UserId, UserId), Decimal>,
    gross_total: Decimal,
    input_count: usize,
}

mod pair_map_serde {
    use super::*;
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;

    pub fn serialize<S: serde::Serializer>(
        balances: &BTreeMap<(UserId, UserId), Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(balances.len()))?;
        for ((first, second), amount) in balances {
            map.serialize_entry(&format!("{}:{}", first, second), amount)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(UserId, UserId), Decimal>, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = BTreeMap<(UserId, UserId), Decimal>;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map with \"user:user\" keys")
            }
            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut map = BTreeMap::new();
                while let Some((key, value)) = access.next_entry::<String, Decimal>()? {
                    let (first, second) = key
                        .split_once(':')
                        .ok_or_else(|| de::Error::custom(format!("invalid key: {key}")))?;
                    if first == second {
                        return Err(de::Error::custom(format!("self pair: {key}")));
                    }
                    if value.is_zero() {
                        return Err(de::Error::custom(format!("zero balance for {key}")));
                    }
                    map.insert((UserId::new(first), UserId::new(second)), value);
                }
                Ok(map)
            }
        }
        deserializer.deserialize_map(V)
    }
}

impl NettingResult {
    /// Total of all input relations before netting.
    pub fn gross_total(&self) -> Decimal {
        self.gross_total
    }

    /// Total of the netted balances.
    pub fn net_total(&self) -> Decimal {
        self.balances.values().map(|v| v.abs()).sum()
    }

    pub fn savings(&self) -> Decimal {
        self.gross_total - self.net_total()
    }

    /// Savings as a percentage of gross.
    pub fn savings_percent(&self) -> f64 {
        if self.gross_total == Decimal::ZERO {
            return 0.0;
        }
        let pct = self.savings() * Decimal::ONE_HUNDRED / self.gross_total;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }

    /// Number of user pairs with a non-zero balance.
    pub fn pair_count(&self) -> usize {
        self.balances.len()
    }

    /// Number of relations that went into the netting.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Signed balances keyed by canonical pair.
    pub fn balances(&self) -> &BTreeMap<(UserId, UserId), Decimal> {
        &self.balances
    }

    /// Directed net debts, in canonical pair order.
    pub fn net_debts(&self) -> Vec<NetDebt> {
        self.balances
            .iter()
            .map(|((first, second), amount)| directed(first, second, *amount))
            .collect()
    }

    /// The net debt between two users, if they don't cancel out.
    pub fn between(&self, a: &UserId, b: &UserId) -> Option<NetDebt> {
        let (first, second) = canonical(a, b);
        self.balances
            .get(&(first.clone(), second.clone()))
            .map(|amount| directed(first, second, *amount))
    }

    /// The netted balances as debt relations, replacing the input set.
    pub fn into_relations(self) -> DebtSet {
        self.net_debts().iter().map(NetDebt::to_relation).collect()
    }
}

fn canonical<'a>(a: &'a UserId, b: &'a UserId) -> (&'a UserId, &'a UserId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn directed(first: &UserId, second: &UserId, amount: Decimal) -> NetDebt {
    if amount > Decimal::ZERO {
        NetDebt {
            from: first.clone(),
            to: second.clone(),
            amount,
        }
    } else {
        NetDebt {
            from: second.clone(),
            to: first.clone(),
            amount: amount.abs(),
        }
    }
}

/// Pairwise debt netting.
pub struct NettingEngine;

impl NettingEngine {
    /// Net the debts between two specific users.
    ///
    /// If A owes B 30 and B owes A 10, A owes B 20 net.
    pub fn bilateral_net(
        relations: &[DebtRelation],
        user_a: &UserId,
        user_b: &UserId,
    ) -> BilateralNettingResult {
        let mut a_to_b = Decimal::ZERO;
        let mut b_to_a = Decimal::ZERO;

        for r in relations {
            if r.from() == user_a && r.to() == user_b {
                a_to_b += r.amount();
            } else if r.from() == user_b && r.to() == user_a {
                b_to_a += r.amount();
            }
        }

        let net = a_to_b - b_to_a;
        let savings = (a_to_b + b_to_a) - net.abs();

        BilateralNettingResult {
            user_a: user_a.clone(),
            user_b: user_b.clone(),
            gross_a_to_b: a_to_b,
            gross_b_to_a: b_to_a,
            net_amount: net,
            savings,
        }
    }

    /// Collapse every pair of users down to one directed balance.
    ///
    /// # Algorithm
    ///
    /// 1. Key each relation by `(min(from, to), max(from, to))`.
    /// 2. Add the amount when `from` is the first slot, subtract otherwise.
    /// 3. Drop pairs whose sum is exactly zero.
    ///
    /// A single signed accumulator per pair makes the result independent of
    /// input order, and netting an already netted set is a no-op.
    pub fn net(relations: &[DebtRelation]) -> NettingResult {
        let mut balances: BTreeMap<(UserId, UserId), Decimal> = BTreeMap::new();
        let mut gross_total = Decimal::ZERO;

        for r in relations {
            gross_total += r.amount();
            let (first, second) = canonical(r.from(), r.to());
            let signed = if first == r.from() {
                r.amount()
            } else {
                -r.amount()
            };
            *balances
                .entry((first.clone(), second.clone()))
                .or_insert(Decimal::ZERO) += signed;
        }

        balances.retain(|_, amount| !amount.is_zero());

        log::debug!(
            "netted {} relation(s) into {} pair balance(s)",
            relations.len(),
            balances.len()
        );

        NettingResult {
            balances,
            gross_total,
            input_count: relations.len(),
        }
    }
}

impl std::fmt::Display for NettingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Netting Result ===")?;
        writeln!(f, "Relations in:   {}", self.input_count)?;
        writeln!(f, "Pairs out:      {}", self.pair_count())?;
        writeln!(f, "Gross Total:    {}", self.gross_total)?;
        writeln!(f, "Net Total:      {}", self.net_total())?;
        writeln!(f, "Savings %:      {:.1}%", self.savings_percent())?;

        if !self.balances.is_empty() {
            writeln!(f)?;
        }
        for debt in self.net_debts() {
            writeln!(f, "  {} owes {} {}", debt.from, debt.to, debt.amount)?;
        }
        Ok(())
    }
}
