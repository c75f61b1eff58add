use crate::core::user::UserId;
use crate::rewards::achievements::Achievement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Highest trust score a user can reach.
pub const MAX_TRUST: u8 = 100;

/// Gamification state of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub experience: u64,
    /// 0..=100
    pub trust_score: u8,
    #[serde(default)]
    pub transactions_recorded: u32,
    #[serde(default)]
    pub settlements: u32,
    #[serde(default)]
    pub reminders_sent: u32,
    #[serde(default)]
    pub reminders_received: u32,
    #[serde(default)]
    pub achievements: BTreeSet<Achievement>,
}

impl UserProfile {
    pub fn new(id: UserId, initial_trust: u8) -> Self {
        Self {
            id,
            experience: 0,
            trust_score: initial_trust.min(MAX_TRUST),
            transactions_recorded: 0,
            settlements: 0,
            reminders_sent: 0,
            reminders_received: 0,
            achievements: BTreeSet::new(),
        }
    }

    pub fn level(&self) -> u32 {
        level_for(self.experience)
    }

    /// Experience still missing for the next level.
    pub fn experience_to_next_level(&self) -> u64 {
        experience_for_level(self.level() + 1).saturating_sub(self.experience)
    }

    pub fn has(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    /// Shift trust by `delta`, clamped to `0..=MAX_TRUST`.
    pub(crate) fn adjust_trust(&mut self, delta: i32) {
        let next = (i32::from(self.trust_score) + delta).clamp(0, i32::from(MAX_TRUST));
        self.trust_score = next as u8;
    }
}

/// Cumulative experience needed to reach `level`: `50 * L * (L - 1)`.
/// Saturates at `u64::MAX` for levels no profile can reach.
pub fn experience_for_level(level: u32) -> u64 {
    let l = u64::from(level.max(1));
    50u64.saturating_mul(l).saturating_mul(l - 1)
}

/// Level reached with `experience` points. Level 1 starts at zero.
///
/// The largest `L` with `L * (L - 1) <= experience / 50`, estimated from the
/// quadratic and then corrected for float error.
pub fn level_for(experience: u64) -> u32 {
    let steps = experience / 50;
    let mut level = ((1.0 + (1.0 + 4.0 * steps as f64).sqrt()) / 2.0) as u64;
    while level > 1 && level * (level - 1) > steps {
        level -= 1;
    }
    while (level + 1) * level <= steps {
        level += 1;
    }
    level.max(1) as u32
}
