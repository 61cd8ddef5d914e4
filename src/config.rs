use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::persistence::SavePolicy;
use crate::errors::{ServiceError, ServiceResult};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://inspection.sqlite?mode=rwc";
pub const DEFAULT_SNAPSHOT_KEY: &str = "rootStore";
pub const DEFAULT_DEBOUNCE_MS: u64 = 750;

/// Settings for opening an [`InspectionStore`](crate::domains::persistence::InspectionStore)
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub database_url: String,
    /// Row the whole tree is written under
    pub snapshot_key: String,
    /// Minimum spacing between two snapshot writes
    pub debounce: Duration,
    pub save_policy: SavePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            save_policy: SavePolicy::default(),
        }
    }
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `INSPECTION_*` variables (a `.env` file is read first)
    pub fn from_env() -> ServiceResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ServiceResult<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("INSPECTION_DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(key) = lookup("INSPECTION_SNAPSHOT_KEY") {
            if key.trim().is_empty() {
                return Err(ServiceError::Configuration(
                    "INSPECTION_SNAPSHOT_KEY cannot be empty".to_string(),
                ));
            }
            config.snapshot_key = key;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "INSPECTION_SAVE_DEBOUNCE_MS")? {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(attempts) = parse_var::<u32>(&lookup, "INSPECTION_SAVE_MAX_ATTEMPTS")? {
            if attempts == 0 {
                return Err(ServiceError::Configuration(
                    "INSPECTION_SAVE_MAX_ATTEMPTS must be at least 1".to_string(),
                ));
            }
            config.save_policy.max_attempts = attempts;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "INSPECTION_SAVE_RETRY_MS")? {
            config.save_policy.base_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> ServiceResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                ServiceError::Configuration(format!("{} has invalid value '{}': {}", name, raw, e))
            })
        })
        .transpose()
}
