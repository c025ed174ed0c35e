//! Dropdown widgets
//!
//! A [`Combobox<P>`] lives inside its parent's boundary, but its option
//! panel is rendered elsewhere in the document. Options are therefore the
//! one lookup that goes through a global "visible panel" query
//! ([`Session::single_visible`](crate::Session::single_visible)).
//!
//! Picking an option closes the panel in the widget itself, so the combobox
//! tracks a `closed` flag and only clicks its toggle to dismiss when nothing
//! has closed it yet.

use crate::control::ControlId;
use crate::driver::{Driver, ElementHandle};
use crate::locator::{Scope, Selector};
use crate::node::{Node, NodeBuilder, NodeCore, NodeKind};
use crate::registry::Resolver;
use crate::result::{NavError, NavResult};
use crate::wait::Condition;

/// Default option selector inside the panel
pub const DEFAULT_OPTION_SELECTOR: &str = "[role=option]";

/// Default toggle selector inside the widget boundary
pub const DEFAULT_TOGGLE_SELECTOR: &str = "[role=combobox]";

/// Definition of one dropdown widget
#[derive(Debug, Clone)]
pub struct ComboboxConfig {
    name: String,
    boundary: Selector,
    panel: Selector,
    option: Selector,
    toggle: ControlId,
    controls: Vec<(ControlId, Resolver)>,
}

impl ComboboxConfig {
    /// Widget `name`, found by `boundary` inside the parent node, whose
    /// options render in a floating element matching `panel`
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: Selector, panel: Selector) -> Self {
        Self {
            name: name.into(),
            boundary,
            panel,
            option: Selector::css(DEFAULT_OPTION_SELECTOR),
            toggle: ControlId::Toggle,
            controls: vec![(ControlId::Toggle, Resolver::css(DEFAULT_TOGGLE_SELECTOR))],
        }
    }

    /// Use a different toggle control
    #[must_use]
    pub fn toggle(mut self, id: ControlId, resolver: impl Into<Resolver>) -> Self {
        let previous = self.toggle;
        self.controls.retain(|(control, _)| *control != previous);
        self.toggle = id;
        self.controls.push((id, resolver.into()));
        self
    }

    /// Selector for one option inside the panel
    #[must_use]
    pub fn option(mut self, selector: Selector) -> Self {
        self.option = selector;
        self
    }

    /// Register an extra control inside the widget
    #[must_use]
    pub fn control(mut self, id: ControlId, resolver: impl Into<Resolver>) -> Self {
        self.controls.push((id, resolver.into()));
        self
    }
}

/// A dropdown widget that returns to `P`
#[derive(Debug)]
pub struct Combobox<P: Node> {
    core: NodeCore,
    parent: P,
    panel: Selector,
    option: Selector,
    toggle: ControlId,
    closed: bool,
}

impl<P: Node> Combobox<P> {
    /// Attach to a widget inside `parent` without opening it
    ///
    /// # Errors
    ///
    /// [`NavError::Timeout`] if the widget boundary never becomes visible
    pub fn attach(parent: P, config: ComboboxConfig) -> NavResult<Self> {
        let mut builder = NodeBuilder::new(parent.session().clone(), config.name)
            .kind(NodeKind::Combobox)
            .scope(parent.context().clone())
            .within(config.boundary);
        for (id, resolver) in config.controls {
            builder = builder.control(id, resolver);
        }
        let core = builder.build()?;

        Ok(Self {
            core,
            parent,
            panel: config.panel,
            option: config.option,
            toggle: config.toggle,
            closed: false,
        })
    }

    /// Control that opens and dismisses the panel
    #[must_use]
    pub const fn toggle(&self) -> ControlId {
        self.toggle
    }

    /// Whether a selection or explicit close already dismissed the panel
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Node this widget returns to
    #[must_use]
    pub const fn parent(&self) -> &P {
        &self.parent
    }

    /// Pick the option whose text matches `value` in the visible panel.
    ///
    /// Selecting closes the panel, so a later [`close`](Self::close) issues
    /// no toggle click. Errors from the option click are reported against
    /// [`ControlId::Value`].
    ///
    /// # Errors
    ///
    /// [`NavError::Timeout`] if no clickable option appears,
    /// [`NavError::AmbiguousMatch`] if several panels are visible under the
    /// strict panel policy
    pub fn set(mut self, value: &str) -> NavResult<Self> {
        let option = self.find_option(value)?;
        tracing::debug!(combobox = %self.core.name(), value, %option, "select option");
        self.core
            .session()
            .driver()
            .click(&option)
            .map_err(|e| e.at(self.core.name(), ControlId::Value))?;
        self.closed = true;
        Ok(self)
    }

    fn find_option(&self, value: &str) -> NavResult<ElementHandle> {
        let session = self.core.session();
        let driver = session.driver();
        let selector = self.option.clone().with_text(value);
        let mut found = None;

        let _ = session.wait_for(self.core.name(), &selector, &Condition::Clickable, || {
            let Some(panel) = session.single_visible(&self.panel)? else {
                return Ok(false);
            };
            let options = match driver.resolve(&selector, &Scope::element(panel)) {
                Ok(options) if selector.text_filter().is_some() => options,
                Ok(options) => with_text(driver, options, value)?,
                Err(NavError::StaleElement { .. }) => return Ok(false),
                Err(e) => return Err(e),
            };
            if Condition::Clickable.evaluate(driver, &options)? {
                found = options.into_iter().next();
                Ok(true)
            } else {
                Ok(false)
            }
        })?;

        found.ok_or_else(|| NavError::Driver {
            message: format!("option {selector} vanished in {}", self.core.name()),
        })
    }

    /// Dismiss the panel unless it is already closed.
    ///
    /// Returns whether a toggle click was issued. Calling it again is a no-op.
    pub fn collapse(&mut self) -> NavResult<bool> {
        if self.closed {
            tracing::trace!(combobox = %self.core.name(), "already closed");
            return Ok(false);
        }
        self.core.click(self.toggle)?;
        self.closed = true;
        Ok(true)
    }

    /// Dismiss if needed and return the parent
    pub fn close(mut self) -> NavResult<P> {
        let _ = self.collapse()?;
        Ok(self.parent)
    }
}

/// Options whose visible text is exactly `value`, for option selectors that
/// cannot carry a text filter themselves
fn with_text(
    driver: &dyn Driver,
    options: Vec<ElementHandle>,
    value: &str,
) -> NavResult<Vec<ElementHandle>> {
    let mut matching = Vec::new();
    for option in options {
        match driver.read_text(&option) {
            Ok(text) if text.trim() == value => matching.push(option),
            Ok(_) | Err(NavError::StaleElement { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(matching)
}

impl<P: Node> Node for Combobox<P> {
    fn core(&self) -> &NodeCore {
        &self.core
    }
}

/// Widget wrappers that select and close like a [`Combobox`]
pub trait ComboboxNode: Node {
    /// Node the widget returns to
    type Parent: Node;

    /// The underlying combobox
    fn into_combobox(self) -> Combobox<Self::Parent>;

    /// Rewrap after a selection
    fn from_combobox(combobox: Combobox<Self::Parent>) -> Self;

    /// Pick an option and stay on the widget
    fn set(self, value: &str) -> NavResult<Self> {
        self.into_combobox().set(value).map(Self::from_combobox)
    }

    /// Dismiss if needed and return the parent
    fn close(self) -> NavResult<Self::Parent> {
        self.into_combobox().close()
    }
}

impl<P: Node> ComboboxNode for Combobox<P> {
    type Parent = P;

    fn into_combobox(self) -> Self {
        self
    }

    fn from_combobox(combobox: Self) -> Self {
        combobox
    }
}
