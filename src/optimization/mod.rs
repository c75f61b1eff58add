//! Pairwise netting and group settle-up planning.

pub mod netting;
pub mod settlement;
