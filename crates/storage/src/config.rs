#![forbid(unsafe_code)]

use crate::store::StoreError;
use std::path::PathBuf;
use std::time::Duration;

pub const STORAGE_DIR_ENV: &str = "TASKLANE_STORAGE_DIR";
pub const BUSY_TIMEOUT_MS_ENV: &str = "TASKLANE_BUSY_TIMEOUT_MS";
pub const PAGE_LIMIT_DEFAULT_ENV: &str = "TASKLANE_PAGE_LIMIT_DEFAULT";
pub const PAGE_LIMIT_MAX_ENV: &str = "TASKLANE_PAGE_LIMIT_MAX";

/// Startup configuration for [`crate::SqliteStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// `None` keeps the database in memory.
    pub storage_dir: Option<PathBuf>,
    pub busy_timeout: Duration,
    pub default_page_limit: usize,
    pub max_page_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            busy_timeout: Duration::from_secs(5),
            default_page_limit: 20,
            max_page_limit: 100,
        }
    }
}

impl StoreConfig {
    pub fn in_dir(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: Some(storage_dir.into()),
            ..Self::default()
        }
    }

    /// Reads `TASKLANE_*` overrides on top of the defaults. Blank values count as unset.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(env_var)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let mut config = Self::default();
        if let Some(dir) = lookup(STORAGE_DIR_ENV) {
            config.storage_dir = Some(PathBuf::from(dir));
        }
        if let Some(ms) = parse_var::<u64>(&lookup, BUSY_TIMEOUT_MS_ENV)? {
            config.busy_timeout = Duration::from_millis(ms);
        }
        if let Some(limit) = parse_var::<usize>(&lookup, PAGE_LIMIT_DEFAULT_ENV)? {
            config.default_page_limit = limit;
        }
        if let Some(limit) = parse_var::<usize>(&lookup, PAGE_LIMIT_MAX_ENV)? {
            config.max_page_limit = limit;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.default_page_limit == 0 {
            return Err(StoreError::Config(
                "default page limit must be at least 1".to_string(),
            ));
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(StoreError::Config(format!(
                "default page limit {} exceeds max page limit {}",
                self.default_page_limit, self.max_page_limit
            )));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| {
            StoreError::Config(format!("{name} must be a non-negative integer (got {raw:?})"))
        })
}
