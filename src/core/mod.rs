//! Foundational records: users, transactions, debt relations and balances.

pub mod debt;
pub mod ledger;
pub mod transaction;
pub mod user;
