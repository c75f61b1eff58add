//! Gamified user state: experience, levels, trust score and badges.
//!
//! None of this feeds back into the debt math. The surrounding app reports
//! activity through [`ActivityEvent`]s and persists the updated
//! [`UserProfile`].

pub mod achievements;
pub mod engine;
pub mod profile;

pub use achievements::Achievement;
pub use engine::{ActivityEvent, RewardEngine, RewardOutcome, RewardsConfig};
pub use profile::UserProfile;
