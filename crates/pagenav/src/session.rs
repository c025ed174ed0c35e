//! The live interface session shared by every node of a scenario.
//!
//! A `Session` is an explicit context object: every node receives it at
//! construction instead of reaching for a global driver, so two scenarios
//! can drive two sessions side by side.

use crate::config::{NavConfig, PanelMatch};
use crate::driver::{Driver, ElementHandle};
use crate::locator::{Scope, Selector};
use crate::result::{NavError, NavResult};
use crate::wait::{WaitResult, Waiter};
use std::fmt::Display;
use std::sync::Arc;

/// Driver plus configuration, cheap to clone
#[derive(Clone)]
pub struct Session {
    driver: Arc<dyn Driver>,
    config: NavConfig,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session with the default configuration
    #[must_use]
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self {
            driver: Arc::new(driver),
            config: NavConfig::default(),
        }
    }

    /// Create a session from an already shared driver
    #[must_use]
    pub fn from_shared(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            config: NavConfig::default(),
        }
    }

    /// Replace the configuration
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Config`] if the config fails validation
    pub fn with_config(mut self, config: NavConfig) -> NavResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The automation backend
    #[must_use]
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Waiter bounded by this session's config
    #[must_use]
    pub const fn waiter(&self) -> Waiter {
        Waiter::with_options(self.config.wait_options())
    }

    /// Run one bounded wait, turning a timeout into [`NavError::Timeout`]
    /// that names the node and the target.
    pub fn wait_for<F>(
        &self,
        node: &str,
        target: &dyn Display,
        waited_for: &dyn Display,
        predicate: F,
    ) -> NavResult<WaitResult>
    where
        F: FnMut() -> NavResult<bool>,
    {
        let result = self.waiter().until(predicate)?;
        if result.success {
            Ok(result)
        } else {
            Err(NavError::Timeout {
                node: node.to_string(),
                target: target.to_string(),
                waited_for: waited_for.to_string(),
                ms: self.config.timeout_ms,
            })
        }
    }

    /// Resolve `selector` across the whole document and keep only visible
    /// elements.
    pub fn find_visible(&self, selector: &Selector) -> NavResult<Vec<ElementHandle>> {
        let mut visible = Vec::new();
        for element in self.driver.resolve(selector, &Scope::Root)? {
            match self.driver.is_visible(&element) {
                Ok(true) => visible.push(element),
                Ok(false) | Err(NavError::StaleElement { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(visible)
    }

    /// The single visible instance of a floating element, applying the
    /// configured [`PanelMatch`] policy.
    ///
    /// Returns `Ok(None)` while nothing is visible.
    pub fn single_visible(&self, selector: &Selector) -> NavResult<Option<ElementHandle>> {
        let mut visible = self.find_visible(selector)?;
        match (visible.len(), self.config.panel_match) {
            (0, _) => Ok(None),
            (1, _) => Ok(visible.pop()),
            (count, PanelMatch::Strict) => Err(NavError::AmbiguousMatch {
                selector: selector.to_string(),
                count,
            }),
            (count, PanelMatch::FirstVisible) => {
                tracing::warn!(%selector, count, "several visible panels, taking the first");
                Ok(visible.into_iter().next())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};

    fn panels(driver: &MockDriver, count: usize) {
        for i in 0..count {
            let _ = driver.add(
                MockElement::new(format!("panel-{i}"), "ul").matching(Selector::css(".menu")),
            );
        }
    }

    fn fast(driver: MockDriver) -> Session {
        Session::new(driver)
            .with_config(NavConfig::new().with_timeout(40).with_poll_interval(5))
            .unwrap()
    }

    #[test]
    fn test_with_config_validates() {
        let err = Session::new(MockDriver::new())
            .with_config(NavConfig::new().with_poll_interval(0))
            .unwrap_err();
        assert!(matches!(err, NavError::Config { .. }));
    }

    #[test]
    fn test_wait_for_timeout_carries_context() {
        let session = fast(MockDriver::new());
        let err = session
            .wait_for("Dialog", &"ok", &"clickable", || Ok(false))
            .unwrap_err();
        match err {
            NavError::Timeout {
                node,
                target,
                waited_for,
                ms,
            } => {
                assert_eq!(node, "Dialog");
                assert_eq!(target, "ok");
                assert_eq!(waited_for, "clickable");
                assert_eq!(ms, 40);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_find_visible_skips_hidden() {
        let driver = MockDriver::new();
        panels(&driver, 2);
        driver.set_visible("panel-0", false);
        let session = fast(driver);
        let found = session.find_visible(&Selector::css(".menu")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "panel-1");
    }

    #[test]
    fn test_single_visible_none() {
        let session = fast(MockDriver::new());
        assert!(session.single_visible(&Selector::css(".menu")).unwrap().is_none());
    }

    #[test]
    fn test_single_visible_strict_rejects_two() {
        let driver = MockDriver::new();
        panels(&driver, 2);
        let session = fast(driver);
        let err = session.single_visible(&Selector::css(".menu")).unwrap_err();
        assert!(matches!(err, NavError::AmbiguousMatch { count: 2, .. }));
    }

    #[test]
    fn test_single_visible_first_visible_policy() {
        let driver = MockDriver::new();
        panels(&driver, 3);
        let session = Session::new(driver)
            .with_config(NavConfig::new().with_panel_match(PanelMatch::FirstVisible))
            .unwrap();
        let panel = session.single_visible(&Selector::css(".menu")).unwrap();
        assert_eq!(panel.map(|p| p.id), Some("panel-0".to_string()));
    }
}
