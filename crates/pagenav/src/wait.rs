//! Wait Mechanisms
//!
//! The condition-wait primitive: poll a predicate at a fixed interval until
//! it holds or a bounded timeout elapses. This is the only place the crate
//! suspends.
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: a wait that cannot be satisfied stops the scenario with a
//!   timeout naming what was waited for
//! - **Muda**: the predicate is checked before the first sleep, so a control
//!   that is already ready costs no polling delay

use crate::driver::{Driver, ElementHandle};
use crate::result::{NavError, NavResult};
use regex::Regex;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

/// Precondition a control must satisfy before an operation proceeds
///
/// Conditions are evaluated against the elements a control currently
/// resolves to; element-level checks look at the first one.
#[derive(Debug, Clone)]
pub enum Condition {
    /// At least one element matches
    Present,
    /// The element is rendered and visible
    Visible,
    /// No element matches, or it is not visible
    Hidden,
    /// The element accepts input
    Enabled,
    /// Visible and enabled
    Clickable,
    /// Visible text contains the string
    TextContains(String),
    /// Visible text matches the pattern
    TextMatches(Regex),
}

impl Condition {
    /// Text containment condition
    #[must_use]
    pub fn text_contains(text: impl Into<String>) -> Self {
        Self::TextContains(text.into())
    }

    /// Regex condition
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Config`] if the pattern does not compile
    pub fn text_matches(pattern: &str) -> NavResult<Self> {
        Regex::new(pattern)
            .map(Self::TextMatches)
            .map_err(|e| NavError::Config {
                message: format!("invalid text pattern {pattern:?}: {e}"),
            })
    }

    /// Evaluate the condition against the currently resolved elements.
    ///
    /// An element that goes stale between resolution and the check counts as
    /// gone: the condition is re-evaluated on the next poll with a fresh
    /// resolution.
    pub fn evaluate(&self, driver: &dyn Driver, elements: &[ElementHandle]) -> NavResult<bool> {
        let Some(first) = elements.first() else {
            return Ok(matches!(self, Self::Hidden));
        };
        let outcome = match self {
            Self::Present => Ok(true),
            Self::Visible => driver.is_visible(first),
            Self::Hidden => driver.is_visible(first).map(|v| !v),
            Self::Enabled => driver.is_enabled(first),
            Self::Clickable => driver.is_visible(first).and_then(|visible| {
                if visible {
                    driver.is_enabled(first)
                } else {
                    Ok(false)
                }
            }),
            Self::TextContains(text) => driver.read_text(first).map(|t| t.contains(text)),
            Self::TextMatches(re) => driver.read_text(first).map(|t| re.is_match(&t)),
        };
        match outcome {
            Err(NavError::StaleElement { .. }) => Ok(matches!(self, Self::Hidden)),
            other => other,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Visible => write!(f, "visible"),
            Self::Hidden => write!(f, "hidden"),
            Self::Enabled => write!(f, "enabled"),
            Self::Clickable => write!(f, "clickable"),
            Self::TextContains(t) => write!(f, "containing text {t:?}"),
            Self::TextMatches(re) => write!(f, "matching /{}/", re.as_str()),
        }
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a wait operation
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Whether the wait was successful
    pub success: bool,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the predicate was evaluated
    pub polls: u32,
}

impl WaitResult {
    /// Create a successful wait result
    #[must_use]
    pub const fn success(elapsed: Duration, polls: u32) -> Self {
        Self {
            success: true,
            elapsed,
            polls,
        }
    }

    /// Create a timeout wait result
    #[must_use]
    pub const fn timeout(elapsed: Duration, polls: u32) -> Self {
        Self {
            success: false,
            elapsed,
            polls,
        }
    }
}

// =============================================================================
// WAITER IMPLEMENTATION
// =============================================================================

/// Polls a predicate until it holds or the timeout elapses
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a new waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// The options this waiter polls with
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait for `predicate` to return `true`.
    ///
    /// The predicate is always evaluated at least once. An `Err` from the
    /// predicate aborts the wait immediately; running out of time is not an
    /// error here but a [`WaitResult`] with `success == false`, so the caller
    /// can attach its own context.
    pub fn until<F>(&self, mut predicate: F) -> NavResult<WaitResult>
    where
        F: FnMut() -> NavResult<bool>,
    {
        let start = Instant::now();
        let timeout = self.options.timeout();
        let poll_interval = self.options.poll_interval();
        let mut polls = 0_u32;

        loop {
            polls += 1;
            if predicate()? {
                tracing::trace!(
                    polls,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "wait satisfied"
                );
                return Ok(WaitResult::success(start.elapsed(), polls));
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                tracing::trace!(
                    polls,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "wait timed out"
                );
                return Ok(WaitResult::timeout(elapsed, polls));
            }
            std::thread::sleep(poll_interval.min(timeout - elapsed));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use std::cell::Cell;

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_chained() {
            let opts = WaitOptions::new().with_timeout(250).with_poll_interval(5);
            assert_eq!(opts.timeout(), Duration::from_millis(250));
            assert_eq!(opts.poll_interval(), Duration::from_millis(5));
        }
    }

    mod waiter_tests {
        use super::*;

        fn fast() -> Waiter {
            Waiter::with_options(WaitOptions::new().with_timeout(60).with_poll_interval(5))
        }

        #[test]
        fn test_immediate_success_polls_once() {
            let result = fast().until(|| Ok(true)).unwrap();
            assert!(result.success);
            assert_eq!(result.polls, 1);
        }

        #[test]
        fn test_timeout_is_not_an_error() {
            let result = fast().until(|| Ok(false)).unwrap();
            assert!(!result.success);
            assert!(result.elapsed >= Duration::from_millis(60));
            assert!(result.polls > 1);
        }

        #[test]
        fn test_zero_timeout_still_checks_once() {
            let waiter = Waiter::with_options(WaitOptions::new().with_timeout(0));
            let calls = Cell::new(0);
            let result = waiter
                .until(|| {
                    calls.set(calls.get() + 1);
                    Ok(false)
                })
                .unwrap();
            assert!(!result.success);
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn test_becomes_true_after_polls() {
            let calls = Cell::new(0);
            let result = fast()
                .until(|| {
                    calls.set(calls.get() + 1);
                    Ok(calls.get() >= 3)
                })
                .unwrap();
            assert!(result.success);
            assert_eq!(result.polls, 3);
        }

        #[test]
        fn test_predicate_error_aborts() {
            let calls = Cell::new(0);
            let err = fast()
                .until(|| {
                    calls.set(calls.get() + 1);
                    Err(NavError::Driver {
                        message: "session closed".into(),
                    })
                })
                .unwrap_err();
            assert!(matches!(err, NavError::Driver { .. }));
            assert_eq!(calls.get(), 1);
        }
    }

    mod condition_tests {
        use super::*;

        fn driver_with_button(visible: bool, enabled: bool) -> (MockDriver, ElementHandle) {
            let driver = MockDriver::new();
            let btn = driver.add(
                crate::mock::MockElement::new("btn", "button")
                    .matching(crate::Selector::css("button"))
                    .text("Save changes")
                    .visible(visible)
                    .enabled(enabled),
            );
            (driver, btn)
        }

        #[test]
        fn test_empty_resolution() {
            let driver = MockDriver::new();
            assert!(!Condition::Present.evaluate(&driver, &[]).unwrap());
            assert!(!Condition::Visible.evaluate(&driver, &[]).unwrap());
            assert!(Condition::Hidden.evaluate(&driver, &[]).unwrap());
        }

        #[test]
        fn test_clickable_requires_visible_and_enabled() {
            let (driver, btn) = driver_with_button(true, false);
            assert!(Condition::Visible.evaluate(&driver, &[btn.clone()]).unwrap());
            assert!(!Condition::Clickable.evaluate(&driver, &[btn.clone()]).unwrap());
            driver.set_enabled("btn", true);
            assert!(Condition::Clickable.evaluate(&driver, &[btn]).unwrap());
        }

        #[test]
        fn test_hidden_when_invisible() {
            let (driver, btn) = driver_with_button(false, true);
            assert!(Condition::Hidden.evaluate(&driver, &[btn]).unwrap());
        }

        #[test]
        fn test_text_conditions() {
            let (driver, btn) = driver_with_button(true, true);
            let elems = [btn];
            assert!(Condition::text_contains("Save").evaluate(&driver, &elems).unwrap());
            assert!(!Condition::text_contains("Delete").evaluate(&driver, &elems).unwrap());
            let re = Condition::text_matches(r"^Save \w+$").unwrap();
            assert!(re.evaluate(&driver, &elems).unwrap());
        }

        #[test]
        fn test_invalid_pattern_is_config_error() {
            let err = Condition::text_matches("(unclosed").unwrap_err();
            assert!(matches!(err, NavError::Config { .. }));
        }

        #[test]
        fn test_stale_element_counts_as_gone() {
            let (driver, btn) = driver_with_button(true, true);
            driver.remove("btn");
            let elems = [btn];
            assert!(!Condition::Visible.evaluate(&driver, &elems).unwrap());
            assert!(Condition::Hidden.evaluate(&driver, &elems).unwrap());
        }

        #[test]
        fn test_display() {
            assert_eq!(Condition::Clickable.to_string(), "clickable");
            assert_eq!(
                Condition::text_contains("x").to_string(),
                "containing text \"x\""
            );
        }
    }
}
