//! Session configuration
//!
//! Bounds for the condition-wait primitive and the policy for resolving
//! floating panels that render outside any node's boundary.

use crate::result::{NavError, NavResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a global "visible floating panel" query treats several visible panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMatch {
    /// More than one visible panel is an `AmbiguousMatch` error
    #[default]
    Strict,
    /// Take the first visible panel in document order
    FirstVisible,
}

/// Configuration shared by every node of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Bound for each wait, in milliseconds
    pub timeout_ms: u64,
    /// Interval between polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Floating panel resolution policy
    pub panel_match: PanelMatch,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            panel_match: PanelMatch::Strict,
        }
    }
}

impl NavConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wait bound
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the floating panel policy
    #[must_use]
    pub const fn with_panel_match(mut self, panel_match: PanelMatch) -> Self {
        self.panel_match = panel_match;
        self
    }

    /// Wait options derived from this config
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Check the config is usable
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Config`] if the poll interval is zero or longer
    /// than the timeout
    pub fn validate(&self) -> NavResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(NavError::Config {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        if self.timeout_ms < self.poll_interval_ms {
            return Err(NavError::Config {
                message: format!(
                    "timeout_ms ({}) is shorter than poll_interval_ms ({})",
                    self.timeout_ms, self.poll_interval_ms
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate a YAML document; missing keys take defaults
    pub fn from_yaml_str(yaml: &str) -> NavResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> NavResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }
}
