//! Analytics configuration
//!
//! Thresholds and presentation settings for the insight rules.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path, if given and present
//! 2. Override in data dir (~/.local/share/spendlens/config.toml)
//! 3. Built-in defaults
//!
//! Every key is optional; missing keys keep their default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound for `recent_window_days` (ten years)
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Settings consumed by the insight generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Prefix for amounts in insight text
    pub currency_symbol: String,
    /// Length in days of each window in the recency trend rule
    pub recent_window_days: i64,
    /// Absolute percent change above which the recency trend is a warning
    pub trend_warning_percent: f64,
    /// Mean expense above which the average rule is a warning
    pub average_warning_threshold: f64,
    /// Mean expense above which the high-average alert fires
    pub high_average_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            recent_window_days: 30,
            trend_warning_percent: 20.0,
            average_warning_threshold: 1000.0,
            high_average_threshold: 2000.0,
        }
    }
}

impl AnalyticsConfig {
    /// Load config, preferring `override_path`, then the data dir override
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        match path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(&p).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", p.display(), e))
                })?;
                let config = Self::parse(&content)?;
                tracing::debug!(path = %p.display(), "Loaded analytics config");
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Parse TOML content on top of the defaults
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.recent_window_days <= 0 || self.recent_window_days > MAX_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "recent_window_days must be between 1 and {} (got {})",
                MAX_WINDOW_DAYS, self.recent_window_days
            )));
        }
        for (name, value) in [
            ("trend_warning_percent", self.trend_warning_percent),
            ("average_warning_threshold", self.average_warning_threshold),
            ("high_average_threshold", self.high_average_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!("{} must be non-negative", name)));
            }
        }
        Ok(())
    }
}

/// Default override location in the platform data directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendlens").join("config.toml"))
}
