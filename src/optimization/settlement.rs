use crate::core::debt::DebtRelation;
use crate::core::ledger::Ledger;
use crate::core::user::UserId;
use crate::optimization::netting::NetDebt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A minimal list of transfers that squares up a whole group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Net position of every user before settling.
    ledger: Ledger,
    transfers: Vec<NetDebt>,
    gross_total: Decimal,
}

impl SettlementPlan {
    pub fn transfers(&self) -> &[NetDebt] {
        &self.transfers
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Total of the debts the plan replaces.
    pub fn gross_total(&self) -> Decimal {
        self.gross_total
    }

    /// Total amount moved by the plan.
    pub fn total_transferred(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    /// Transfers a given user has to make.
    pub fn payments_by(&self, user: &UserId) -> Vec<&NetDebt> {
        self.transfers.iter().filter(|t| &t.from == user).collect()
    }

    /// True when executing every transfer leaves all users flat.
    pub fn is_complete(&self) -> bool {
        let mut after = self.ledger.clone();
        for t in &self.transfers {
            // Paying back moves position from creditor to debtor.
            after.transfer(&t.to, &t.from, t.amount);
        }
        after.is_settled()
    }
}

/// Plans group-wide settle-ups.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Greedily match the largest debtor with the largest creditor until
    /// every net position is zero.
    ///
    /// Each step zeroes at least one user, so a group of `n` users with
    /// non-zero positions needs at most `n - 1` transfers.
    pub fn plan(relations: &[DebtRelation]) -> SettlementPlan {
        let ledger = Ledger::from_relations(relations);
        let gross_total: Decimal = relations.iter().map(|r| r.amount()).sum();

        let mut creditors = ledger.creditors();
        let mut debtors = ledger.debtors();
        let mut transfers = Vec::new();

        while let (Some(creditor), Some(debtor)) = (creditors.first_mut(), debtors.first_mut()) {
            let amount = creditor.1.min(debtor.1);
            transfers.push(NetDebt {
                from: debtor.0.clone(),
                to: creditor.0.clone(),
                amount,
            });
            creditor.1 -= amount;
            debtor.1 -= amount;

            if creditor.1.is_zero() {
                creditors.remove(0);
            }
            if debtor.1.is_zero() {
                debtors.remove(0);
            }
            resort(&mut creditors);
            resort(&mut debtors);
        }

        log::debug!(
            "settle-up plan: {} relation(s) replaced by {} transfer(s)",
            relations.len(),
            transfers.len()
        );

        SettlementPlan {
            ledger,
            transfers,
            gross_total,
        }
    }
}

fn resort(side: &mut [(UserId, Decimal)]) {
    side.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settle-up Plan ===")?;
        writeln!(f, "Gross debts:      {}", self.gross_total)?;
        writeln!(f, "To transfer:      {}", self.total_transferred())?;
        writeln!(f, "Transfers:        {}", self.transfers.len())?;
        writeln!(f)?;
        for t in &self.transfers {
            writeln!(f, "  {} pays {} {}", t.from, t.to, t.amount)?;
        }
        Ok(())
    }
}
