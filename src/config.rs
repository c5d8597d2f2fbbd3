use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const ENV_SALES_URL: &str = "DASHBOARD_SALES_URL";
pub const ENV_EXPENSES_URL: &str = "DASHBOARD_EXPENSES_URL";
pub const ENV_CACHE_TTL_SECS: &str = "DASHBOARD_CACHE_TTL_SECS";
pub const ENV_ACCESS_SECRET: &str = "DASHBOARD_ACCESS_SECRET";

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Published CSV export of the sales sheet.
    pub sales_url: String,
    /// Published CSV export of the ad-spend sheet.
    pub expenses_url: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Shared team password.
    pub access_secret: String,
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("sales_url", &self.sales_url)
            .field("expenses_url", &self.expenses_url)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}

impl DashboardConfig {
    pub fn new(
        sales_url: impl Into<String>,
        expenses_url: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            sales_url: sales_url.into(),
            expenses_url: expenses_url.into(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            access_secret: access_secret.into(),
        }
    }

    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source, e.g. the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| DashboardError::Config(format!("{} is not set", key)))
        };

        let cache_ttl_secs = match lookup(ENV_CACHE_TTL_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                DashboardError::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_CACHE_TTL_SECS, raw
                ))
            })?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        let config = Self {
            sales_url: required(ENV_SALES_URL)?,
            expenses_url: required(ENV_EXPENSES_URL)?,
            cache_ttl_secs,
            access_secret: required(ENV_ACCESS_SECRET)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sales_url.trim().is_empty() {
            return Err(DashboardError::Config("sales_url is empty".to_string()));
        }
        if self.expenses_url.trim().is_empty() {
            return Err(DashboardError::Config("expenses_url is empty".to_string()));
        }
        if self.access_secret.is_empty() {
            return Err(DashboardError::Config("access_secret is empty".to_string()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
