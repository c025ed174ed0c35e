//! Pagenav: Page-Object Navigation Graphs for UI Automation
//!
//! Model an application as a graph of typed nodes (screens, dialogs,
//! sections, dropdown widgets). Each node knows its own controls, resolves
//! them inside its own boundary, and returns the node a step leads to, so a
//! scenario reads as one fluent chain checked by the compiler.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PAGENAV Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Node       │    │ Control    │            │
//! │   │ (fluent    │───►│ Popup      │───►│ Registry   │            │
//! │   │  chain)    │    │ Combobox   │    │ (scoped)   │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             │                   │
//! │                     ┌────────────┐    ┌─────▼──────┐            │
//! │                     │ Waiter     │◄───│ Session    │            │
//! │                     │ (bounded   │    │ Arc<dyn    │            │
//! │                     │  polling)  │    │  Driver>   │            │
//! │                     └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagenav::prelude::*;
//! use pagenav::mock::{Effect, MockDriver, MockElement};
//!
//! # fn main() -> NavResult<()> {
//! let driver = MockDriver::new();
//! driver.add(MockElement::new("new", "button").matching(Selector::css("button.new")));
//! driver.add(MockElement::new("dialog", "div").matching(Selector::css("[role=dialog]")).visible(false));
//! driver.add(MockElement::new("cancel", "button").child_of("dialog").matching(Selector::css(".cancel")));
//! driver.on_click("new", Effect::Show("dialog".into()));
//!
//! let projects: Screen = NodeBuilder::new(Session::new(driver.clone()), "Projects")
//!     .control(ControlId::Create, Resolver::css("button.new"))
//!     .build()?
//!     .into();
//!
//! let dialog = PopupConfig::new("NewProject", Selector::css("[role=dialog]"))
//!     .control(ControlId::Cancel, Resolver::css(".cancel"));
//!
//! let back = projects.open_popup(ControlId::Create, dialog)?.cancel()?;
//! assert_eq!(back.name(), "Projects");
//! assert_eq!(driver.clicks("cancel"), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod combobox;
mod config;
mod control;
mod driver;
mod locator;
mod node;
mod popup;
mod registry;
mod result;
mod session;
mod wait;

/// In-memory driver for tests and demos
pub mod mock;

/// Test log setup
pub mod logging;

pub use combobox::{
    Combobox, ComboboxConfig, ComboboxNode, DEFAULT_OPTION_SELECTOR, DEFAULT_TOGGLE_SELECTOR,
};
pub use config::{NavConfig, PanelMatch};
pub use control::ControlId;
pub use driver::{Driver, ElementHandle};
pub use locator::{Scope, Selector};
pub use node::{Node, NodeBuilder, NodeCore, NodeId, NodeKind, Screen};
pub use popup::{Action, ActionFn, Popup, PopupConfig, PopupNode, Teardown};
pub use registry::{ControlRegistry, ResolveFn, Resolver};
pub use result::{LookupReason, NavError, NavResult};
pub use session::Session;
pub use wait::{
    Condition, WaitOptions, WaitResult, Waiter, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        Action, Combobox, ComboboxConfig, ComboboxNode, Condition, ControlId, ControlRegistry,
        Driver, ElementHandle, NavConfig, NavError, NavResult, Node, NodeBuilder, NodeCore,
        NodeKind, PanelMatch, Popup, PopupConfig, PopupNode, Resolver, Scope, Screen, Selector,
        Session, Teardown, DEFAULT_OPTION_SELECTOR, DEFAULT_TOGGLE_SELECTOR,
    };
}
