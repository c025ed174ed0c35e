//! Result and error types for pagenav.

use crate::control::ControlId;
use thiserror::Error;

/// Result type for pagenav operations
pub type NavResult<T> = Result<T, NavError>;

/// Why a control lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupReason {
    /// The control was never registered on the node
    Unregistered,
    /// The control is registered but currently resolves to zero elements
    NoMatch,
}

impl std::fmt::Display for LookupReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unregistered => write!(f, "not registered"),
            Self::NoMatch => write!(f, "no live element matches"),
        }
    }
}

/// Errors that can occur while driving a node graph
#[derive(Debug, Error)]
pub enum NavError {
    /// Control lookup failed
    #[error("Control {control} on {node}: {reason}")]
    Lookup {
        /// Node that owns the registry
        node: String,
        /// Requested control
        control: ControlId,
        /// Failure reason
        reason: LookupReason,
    },

    /// A condition did not hold within the bound
    #[error("Timed out after {ms}ms on {node} waiting for {target} to be {waited_for}")]
    Timeout {
        /// Node the wait was issued from
        node: String,
        /// Control or element waited on
        target: String,
        /// Description of the condition
        waited_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// A resolved handle no longer refers to a live element
    #[error("Stale element: {element}")]
    StaleElement {
        /// Element handle id
        element: String,
    },

    /// The element exists but cannot receive the action
    #[error("Element {element} cannot receive {action}")]
    NotInteractable {
        /// Element handle id
        element: String,
        /// Action that was attempted
        action: String,
    },

    /// More than one element matched a query expected to be singular
    #[error("{count} elements match {selector}, expected exactly one")]
    AmbiguousMatch {
        /// Selector that matched too much
        selector: String,
        /// Number of matches
        count: usize,
    },

    /// Driver-level failure with the step that issued it
    #[error("{node}.{control}: {source}")]
    Step {
        /// Node the step ran on
        node: String,
        /// Control the step targeted
        control: ControlId,
        /// Underlying error
        #[source]
        source: Box<NavError>,
    },

    /// Automation backend error
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl NavError {
    /// Wrap a driver-originated error with the node and control it happened on.
    ///
    /// Errors that already carry that context pass through unchanged.
    #[must_use]
    pub fn at(self, node: &str, control: ControlId) -> Self {
        match self {
            Self::StaleElement { .. }
            | Self::NotInteractable { .. }
            | Self::Driver { .. }
            | Self::AmbiguousMatch { .. } => Self::Step {
                node: node.to_string(),
                control,
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// The innermost error behind any `Step` wrappers
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Step { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this is a lookup failure
    #[must_use]
    pub fn is_lookup(&self) -> bool {
        matches!(self.root_cause(), Self::Lookup { .. })
    }

    /// Whether this is a timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.root_cause(), Self::Timeout { .. })
    }

    /// Whether this is a stale element error
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self.root_cause(), Self::StaleElement { .. })
    }

    /// Whether this is an ambiguous match
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self.root_cause(), Self::AmbiguousMatch { .. })
    }
}
