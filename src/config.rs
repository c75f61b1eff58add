//! Engine configuration, read from the environment (and `.env` if present).

use crate::rewards::RewardsConfig;
use crate::split::SplitConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const DECIMAL_PLACES_VAR: &str = "DIVVY_DECIMAL_PLACES";
pub const ON_TIME_DAYS_VAR: &str = "DIVVY_ON_TIME_DAYS";
pub const INITIAL_TRUST_VAR: &str = "DIVVY_INITIAL_TRUST";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub split: SplitConfig,
    pub rewards: RewardsConfig,
}

impl EngineConfig {
    /// Defaults overridden by `DIVVY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(dp) = parse_var::<u32>(&lookup, DECIMAL_PLACES_VAR)? {
            config.split.decimal_places = Some(dp);
        }
        if let Some(days) = parse_var::<u32>(&lookup, ON_TIME_DAYS_VAR)? {
            config.rewards.on_time_days = days;
        }
        if let Some(trust) = parse_var::<u8>(&lookup, INITIAL_TRUST_VAR)? {
            if trust > crate::rewards::profile::MAX_TRUST {
                return Err(ConfigError::InvalidValue {
                    var: INITIAL_TRUST_VAR,
                    value: trust.to_string(),
                });
            }
            config.rewards.initial_trust = trust;
        }
        Ok(config)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}
