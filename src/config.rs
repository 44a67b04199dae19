//! Scroll mode configuration.
//!
//! Values come from three places, in the order hosts usually reach for them:
//! `Default` (the constants in [`crate::consts`]), a JSON blob handed over by
//! the embedding application, or environment variables on native hosts.
//! Browser hosts have no process environment, so [`ScrollConfig::from_lookup`]
//! accepts any key/value source.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BASE_WIDTH, DEFAULT_HEIGHT_RATIO, DEFAULT_STORAGE_KEY};
use crate::space::LogicalSpace;

pub const ENV_BASE_WIDTH: &str = "SCROLLBOARD_BASE_WIDTH";
pub const ENV_HEIGHT_RATIO: &str = "SCROLLBOARD_HEIGHT_RATIO";
pub const ENV_STORAGE_KEY: &str = "SCROLLBOARD_STORAGE_KEY";

/// Error returned when configuration cannot be parsed or is out of range.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{key} is not a number: {raw:?}")]
    NotANumber { key: &'static str, raw: String },
    #[error("base width must be finite and positive, got {0}")]
    BaseWidth(f64),
    #[error("height ratio must be finite and positive, got {0}")]
    HeightRatio(f64),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
}

/// Tunables for one scroll mode instance. Fixed for the lifetime of the mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Logical document width (`BASE_WIDTH`).
    pub base_width: f64,
    /// Document height as a multiple of `base_width`.
    pub height_ratio: f64,
    /// Key of the replicated `{ scrollTop }` record.
    pub storage_key: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            base_width: DEFAULT_BASE_WIDTH,
            height_ratio: DEFAULT_HEIGHT_RATIO,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

impl ScrollConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `SCROLLBOARD_BASE_WIDTH`: default 1600
    /// - `SCROLLBOARD_HEIGHT_RATIO`: default 3
    /// - `SCROLLBOARD_STORAGE_KEY`: default `scroll`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but unparsable or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key/value source using the env variable names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is unparsable or out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            base_width: parse_f64(ENV_BASE_WIDTH, lookup(ENV_BASE_WIDTH), defaults.base_width)?,
            height_ratio: parse_f64(ENV_HEIGHT_RATIO, lookup(ENV_HEIGHT_RATIO), defaults.height_ratio)?,
            storage_key: lookup(ENV_STORAGE_KEY).unwrap_or(defaults.storage_key),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or a range error from [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field describes a usable logical space.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_width.is_finite() || self.base_width <= 0.0 {
            return Err(ConfigError::BaseWidth(self.base_width));
        }
        if !self.height_ratio.is_finite() || self.height_ratio <= 0.0 {
            return Err(ConfigError::HeightRatio(self.height_ratio));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }

    /// The logical document space described by this config.
    #[must_use]
    pub fn space(&self) -> LogicalSpace {
        LogicalSpace::new(self.base_width, self.base_width * self.height_ratio)
    }
}

fn parse_f64(key: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::NotANumber { key, raw }),
    }
}
