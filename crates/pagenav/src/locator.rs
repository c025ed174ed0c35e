//! Selectors and context boundaries.
//!
//! # Design Philosophy
//!
//! - **Scoped by default**: a [`Selector`] is always evaluated inside a
//!   [`Scope`]; only [`Scope::Root`] searches the whole application
//! - **Backend-neutral**: selectors are plain data handed to the
//!   [`Driver`](crate::driver::Driver), which owns the matching engine

use crate::driver::ElementHandle;
use serde::{Deserialize, Serialize};

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Text content selector
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Combined selector with text filter
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Filter by text content
    ///
    /// CSS selectors become [`Selector::CssWithText`]; a text selector is
    /// replaced by the new text. Other kinds cannot carry a text filter and
    /// are returned unchanged.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        match self {
            Self::Css(css) | Self::CssWithText { css, .. } => Self::CssWithText {
                css,
                text: text.into(),
            },
            Self::Text(_) => Self::Text(text.into()),
            other => other,
        }
    }

    /// Text filter carried by this selector, if any
    #[must_use]
    pub fn text_filter(&self) -> Option<&str> {
        match self {
            Self::Text(t) | Self::CssWithText { text: t, .. } => Some(t.as_str()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Text(t) => write!(f, "text={t:?}"),
            Self::TestId(id) => write!(f, "data-testid={id}"),
            Self::CssWithText { css, text } => write!(f, "css={css} >> text={text:?}"),
        }
    }
}

/// Context boundary within which a node's controls are resolved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// The whole application document
    #[default]
    Root,
    /// Descendants of one element
    Element(ElementHandle),
}

impl Scope {
    /// Scope a lookup to one element
    #[must_use]
    pub fn element(handle: ElementHandle) -> Self {
        Self::Element(handle)
    }

    /// Whether this is the whole document
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// The boundary element, if any
    #[must_use]
    pub const fn handle(&self) -> Option<&ElementHandle> {
        match self {
            Self::Root => None,
            Self::Element(h) => Some(h),
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "document"),
            Self::Element(h) => write!(f, "#{}", h.id),
        }
    }
}
