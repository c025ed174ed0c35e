//! Driver - Abstract Automation Interface
//!
//! The node graph never talks to a browser directly. Everything it needs from
//! the automation layer is expressed by the [`Driver`] trait, so a real
//! WebDriver/CDP backend and the in-memory [`MockDriver`](crate::mock::MockDriver)
//! are interchangeable.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Node graph (Screen / Popup / Combobox)                      │
//! │      │  resolve + wait + interact                            │
//! │      ▼                                                       │
//! │  Session ──► Arc<dyn Driver>                                 │
//! │                 ├── WebDriver / CDP backend (external)       │
//! │                 └── MockDriver (unit + scenario tests)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All calls are synchronous. Implementations report
//! [`NavError::StaleElement`](crate::NavError::StaleElement) when a handle's
//! interface node was removed or replaced and
//! [`NavError::NotInteractable`](crate::NavError::NotInteractable) when it
//! exists but cannot receive the action.

use crate::locator::{Scope, Selector};
use crate::result::NavResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Live reference to one interface element
///
/// Handles are opaque: state (visibility, text, ...) is always read back
/// through the driver, never cached on the handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Backend identifier for the element
    pub id: String,
    /// Element tag name
    pub tag_name: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
        }
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}#{}>", self.tag_name, self.id)
    }
}

/// Automation backend consumed by the node graph
pub trait Driver: Send + Sync {
    /// Resolve every live element matching `selector` inside `scope`, in
    /// document order
    fn resolve(&self, selector: &Selector, scope: &Scope) -> NavResult<Vec<ElementHandle>>;

    /// Whether the element is rendered and visible
    fn is_visible(&self, element: &ElementHandle) -> NavResult<bool>;

    /// Whether the element accepts input
    fn is_enabled(&self, element: &ElementHandle) -> NavResult<bool>;

    /// Click the element
    fn click(&self, element: &ElementHandle) -> NavResult<()>;

    /// Clear the element's current value
    fn clear(&self, element: &ElementHandle) -> NavResult<()>;

    /// Type text into the element
    fn type_text(&self, element: &ElementHandle, text: &str) -> NavResult<()>;

    /// Read the element's visible text
    fn read_text(&self, element: &ElementHandle) -> NavResult<String>;

    /// Read an attribute of the element
    fn attribute(&self, element: &ElementHandle, name: &str) -> NavResult<Option<String>>;

    /// Hand a local file to a file input
    fn upload_file(&self, element: &ElementHandle, path: &Path) -> NavResult<()>;

    /// Move the pointer over the element
    fn hover(&self, element: &ElementHandle) -> NavResult<()>;
}
