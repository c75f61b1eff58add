//! # divvy-engine
//!
//! Expense splitting and debt settlement for shared bills.
//!
//! Given a group transaction (who paid, who shares it, and how), this
//! engine computes who owes whom, nets opposing debts between each pair of
//! users, and plans the fewest transfers that square up a group.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: users, transactions, debt relations, ledger
//! - **split** — Equal, percentage, adjustment, exact-amount and shares splits
//! - **optimization** — Pairwise netting and group settle-up planning
//! - **rewards** — Experience, trust score and achievements
//! - **simulation** — Random group generation for benchmarks

pub mod config;
pub mod core;
pub mod optimization;
pub mod rewards;
pub mod simulation;
pub mod split;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::core::debt::{DebtRelation, DebtSet};
    pub use crate::core::ledger::Ledger;
    pub use crate::core::transaction::{SplitMethod, Transaction};
    pub use crate::core::user::UserId;
    pub use crate::optimization::netting::{NetDebt, NettingEngine, NettingResult};
    pub use crate::optimization::settlement::{SettlementPlan, SettlementPlanner};
    pub use crate::rewards::{ActivityEvent, RewardEngine, UserProfile};
    pub use crate::split::{SplitCalculator, SplitError};
}
