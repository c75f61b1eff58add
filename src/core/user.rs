use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user taking part in shared expenses.
///
/// Ids are compared lexicographically. Netting relies on that ordering to
/// pick a canonical slot for every pair of users.
///
/// # Examples
///
/// ```
/// use divvy_engine::core::user::UserId;
///
/// let alice = UserId::new("alice");
/// let bob = UserId::new("bob");
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this user ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
