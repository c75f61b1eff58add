use serde::{Deserialize, Serialize};
use std::fmt;

/// Milestones a user can unlock. Each one is shown as a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstTransaction,
    FirstSettlement,
    TenSettlements,
    BigSpender,
    Trustworthy,
    Nudger,
    LevelFive,
}

impl Achievement {
    pub const ALL: [Achievement; 7] = [
        Achievement::FirstTransaction,
        Achievement::FirstSettlement,
        Achievement::TenSettlements,
        Achievement::BigSpender,
        Achievement::Trustworthy,
        Achievement::Nudger,
        Achievement::LevelFive,
    ];

    /// Badge title.
    pub fn badge(&self) -> &'static str {
        match self {
            Achievement::FirstTransaction => "Opening Tab",
            Achievement::FirstSettlement => "Square Deal",
            Achievement::TenSettlements => "Debt Slayer",
            Achievement::BigSpender => "Big Spender",
            Achievement::Trustworthy => "Trustworthy",
            Achievement::Nudger => "Gentle Nudger",
            Achievement::LevelFive => "Seasoned Splitter",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstTransaction => "Record your first shared expense",
            Achievement::FirstSettlement => "Settle a debt for the first time",
            Achievement::TenSettlements => "Settle ten debts",
            Achievement::BigSpender => "Record a single expense of 1000 or more",
            Achievement::Trustworthy => "Reach a trust score of 80",
            Achievement::Nudger => "Send ten payment reminders",
            Achievement::LevelFive => "Reach level 5",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.badge())
    }
}
