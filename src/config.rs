//! Panel configuration parsed from environment variables.

use std::time::Duration;

use crate::actions::{CompatibilityPolicy, FilterOptions};
use crate::error::ErrorCode;

pub const DEFAULT_MENU_TITLE: &str = "Options";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown PANEL_COMPAT_POLICY: {0} (expected 'lenient' or 'strict')")]
    UnknownPolicy(String),
    #[error("invalid PANEL_COMPAT_TIMEOUT_MS: {0}")]
    InvalidTimeout(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownPolicy(_) => "E_CONFIG_POLICY",
            Self::InvalidTimeout(_) => "E_CONFIG_TIMEOUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub compat_policy: CompatibilityPolicy,
    pub compat_timeout: Option<Duration>,
    pub menu_title: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            compat_policy: CompatibilityPolicy::Lenient,
            compat_timeout: None,
            menu_title: DEFAULT_MENU_TITLE.to_string(),
        }
    }
}

impl PanelConfig {
    /// Build typed panel config from environment variables.
    ///
    /// Optional:
    /// - `PANEL_COMPAT_POLICY`: `lenient` (default) or `strict`
    /// - `PANEL_COMPAT_TIMEOUT_MS`: per-predicate limit; unset waits forever
    /// - `PANEL_MENU_TITLE`: default `Options`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PanelConfig::from_env`] but reads through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let compat_policy = parse_policy(lookup("PANEL_COMPAT_POLICY").as_deref())?;
        let compat_timeout = parse_timeout(lookup("PANEL_COMPAT_TIMEOUT_MS").as_deref())?;
        let menu_title = lookup("PANEL_MENU_TITLE")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_MENU_TITLE.to_string());

        Ok(Self { compat_policy, compat_timeout, menu_title })
    }

    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions { policy: self.compat_policy, timeout: self.compat_timeout }
    }
}

fn parse_policy(raw: Option<&str>) -> Result<CompatibilityPolicy, ConfigError> {
    match raw.unwrap_or("lenient") {
        "lenient" => Ok(CompatibilityPolicy::Lenient),
        "strict" => Ok(CompatibilityPolicy::Strict),
        other => Err(ConfigError::UnknownPolicy(other.to_string())),
    }
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidTimeout(raw.to_string())),
        Ok(ms) => Ok(Some(Duration::from_millis(ms))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
