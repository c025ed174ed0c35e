//! Navigable nodes
//!
//! A node is one screen, dialog, section or widget of the application. It
//! owns a [`ControlRegistry`] bound to its context boundary and exposes a
//! fluent API: interactions that stay on the node hand the node back,
//! navigation hands back the node that was reached.
//!
//! ```text
//! ┌────────────┐ open_popup  ┌─────────────────┐
//! │   Screen   │────────────►│  Popup<Screen>  │
//! │            │◄────────────│                 │
//! └────────────┘  ok/cancel  └─────────────────┘
//!       │ navigate
//!       ▼
//! ┌────────────┐
//! │  any Node  │
//! └────────────┘
//! ```

use crate::combobox::{Combobox, ComboboxConfig};
use crate::control::ControlId;
use crate::driver::ElementHandle;
use crate::locator::{Scope, Selector};
use crate::popup::{Popup, PopupConfig};
use crate::registry::{ControlRegistry, Resolver};
use crate::result::{LookupReason, NavError, NavResult};
use crate::session::Session;
use crate::wait::Condition;
use std::path::Path;
use uuid::Uuid;

/// Identity of one node instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Fresh random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of interface region a node models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Full screen
    #[default]
    Screen,
    /// Modal dialog
    Popup,
    /// Dropdown widget
    Combobox,
    /// Region of a screen
    Section,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Screen => write!(f, "screen"),
            Self::Popup => write!(f, "popup"),
            Self::Combobox => write!(f, "combobox"),
            Self::Section => write!(f, "section"),
        }
    }
}

/// State shared by every node: identity, session and registry
#[derive(Debug, Clone)]
pub struct NodeCore {
    id: NodeId,
    name: String,
    kind: NodeKind,
    session: Session,
    registry: ControlRegistry,
}

impl NodeCore {
    /// Node identity
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Display name used in errors and logs
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node kind
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Live session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Control registry
    #[must_use]
    pub const fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    /// Context boundary
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        self.registry.scope()
    }

    /// Wait until `condition` holds for control `id`.
    ///
    /// Each poll re-resolves the control; a registered control that
    /// currently matches nothing is "not yet". Returns the first matching
    /// element, or `None` when the condition holds with nothing present.
    ///
    /// # Errors
    ///
    /// [`NavError::Timeout`] naming this node and `id`, or the lookup /
    /// driver error that aborted the wait
    pub fn wait_for_control(
        &self,
        id: ControlId,
        condition: &Condition,
    ) -> NavResult<Option<ElementHandle>> {
        let mut target = None;
        let _ = self.session.wait_for(&self.name, &id, condition, || {
            let elements = self.registry.resolve_all(&self.session, id)?;
            if condition.evaluate(self.session.driver(), &elements)? {
                target = elements.into_iter().next();
                Ok(true)
            } else {
                Ok(false)
            }
        })?;
        Ok(target)
    }

    fn present(&self, id: ControlId, condition: &Condition) -> NavResult<ElementHandle> {
        self.wait_for_control(id, condition)?
            .ok_or_else(|| NavError::Lookup {
                node: self.name.clone(),
                control: id,
                reason: LookupReason::NoMatch,
            })
    }

    /// Wait for control `id` to be present and return its first element
    ///
    /// # Errors
    ///
    /// [`NavError::Lookup`] at once if unregistered, [`NavError::Timeout`]
    /// if it never appears
    pub fn get(&self, id: ControlId) -> NavResult<ElementHandle> {
        self.present(id, &Condition::Present)
    }

    /// Wait for `id` to be clickable, then click it
    pub fn click(&self, id: ControlId) -> NavResult<()> {
        let element = self.present(id, &Condition::Clickable)?;
        tracing::debug!(node = %self.name, control = %id, %element, "click");
        self.session
            .driver()
            .click(&element)
            .map_err(|e| e.at(&self.name, id))
    }

    /// Wait for `id` to be clickable, clear it and type `value`
    pub fn set_value(&self, id: ControlId, value: &str) -> NavResult<()> {
        let element = self.present(id, &Condition::Clickable)?;
        tracing::debug!(node = %self.name, control = %id, value, "set value");
        let driver = self.session.driver();
        driver
            .clear(&element)
            .and_then(|()| driver.type_text(&element, value))
            .map_err(|e| e.at(&self.name, id))
    }

    /// Wait for `condition` to hold on `id`
    pub fn ensure(&self, id: ControlId, condition: &Condition) -> NavResult<()> {
        tracing::debug!(node = %self.name, control = %id, %condition, "ensure");
        self.wait_for_control(id, condition).map(|_| ())
    }

    /// Wait for `id` to be visible and read its text
    pub fn read_text(&self, id: ControlId) -> NavResult<String> {
        let element = self.present(id, &Condition::Visible)?;
        self.session
            .driver()
            .read_text(&element)
            .map_err(|e| e.at(&self.name, id))
    }

    /// Wait for `id` to be present and read attribute `name`
    pub fn attribute(&self, id: ControlId, name: &str) -> NavResult<Option<String>> {
        let element = self.present(id, &Condition::Present)?;
        self.session
            .driver()
            .attribute(&element, name)
            .map_err(|e| e.at(&self.name, id))
    }

    /// Whether `id` currently resolves to at least one element, without waiting
    pub fn is_present(&self, id: ControlId) -> NavResult<bool> {
        Ok(!self.registry.resolve_all(&self.session, id)?.is_empty())
    }

    /// Wait for `id` to be visible and hover it
    pub fn hover(&self, id: ControlId) -> NavResult<()> {
        let element = self.present(id, &Condition::Visible)?;
        tracing::debug!(node = %self.name, control = %id, "hover");
        self.session
            .driver()
            .hover(&element)
            .map_err(|e| e.at(&self.name, id))
    }

    /// Hand `path` to file input `id`
    ///
    /// # Errors
    ///
    /// [`NavError::Io`] if `path` does not exist, before the driver is touched
    pub fn upload(&self, id: ControlId, path: &Path) -> NavResult<()> {
        let _ = std::fs::metadata(path)?;
        let element = self.present(id, &Condition::Present)?;
        tracing::debug!(node = %self.name, control = %id, path = %path.display(), "upload");
        self.session
            .driver()
            .upload_file(&element, path)
            .map_err(|e| e.at(&self.name, id))
    }
}

/// Builder for [`NodeCore`]
#[derive(Debug)]
pub struct NodeBuilder {
    session: Session,
    name: String,
    kind: NodeKind,
    scope: Scope,
    boundary: Option<Selector>,
    base: Option<ControlRegistry>,
    controls: Vec<(ControlId, Resolver)>,
}

impl NodeBuilder {
    /// Start a node named `name` on `session`, bounded by the whole document
    #[must_use]
    pub fn new(session: Session, name: impl Into<String>) -> Self {
        Self {
            session,
            name: name.into(),
            kind: NodeKind::Screen,
            scope: Scope::Root,
            boundary: None,
            base: None,
            controls: Vec::new(),
        }
    }

    /// Set the node kind
    #[must_use]
    pub const fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Use an already known boundary
    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Bound the node by the element `selector` finds inside the current
    /// scope. [`build`](Self::build) waits for it to become visible.
    #[must_use]
    pub fn within(mut self, selector: Selector) -> Self {
        self.boundary = Some(selector);
        self
    }

    /// Register a control
    #[must_use]
    pub fn control(mut self, id: ControlId, resolver: impl Into<Resolver>) -> Self {
        self.controls.push((id, resolver.into()));
        self
    }

    /// Inherit every control of `base`; controls registered on this builder
    /// win on identical ids, and later bases win over earlier ones.
    #[must_use]
    pub fn extend(mut self, base: &ControlRegistry) -> Self {
        self.base = Some(match self.base.take() {
            Some(earlier) => ControlRegistry::merge(&earlier, base.clone()),
            None => base.clone(),
        });
        self
    }

    /// Resolve the boundary and assemble the node
    ///
    /// # Errors
    ///
    /// [`NavError::Timeout`] if the boundary never becomes visible
    pub fn build(self) -> NavResult<NodeCore> {
        let scope = match &self.boundary {
            Some(selector) => Scope::element(self.pin(selector)?),
            None => self.scope.clone(),
        };

        let mut own = ControlRegistry::new(self.name.clone(), scope);
        for (id, resolver) in self.controls {
            let _ = own.register(id, resolver);
        }
        let registry = match &self.base {
            Some(base) => ControlRegistry::merge(base, own),
            None => own,
        };

        let core = NodeCore {
            id: NodeId::new(),
            name: self.name,
            kind: self.kind,
            session: self.session,
            registry,
        };
        tracing::debug!(
            node = %core.name,
            kind = %core.kind,
            id = %core.id,
            scope = %core.scope(),
            controls = core.registry.len(),
            "node built"
        );
        Ok(core)
    }

    fn pin(&self, selector: &Selector) -> NavResult<ElementHandle> {
        let driver = self.session.driver();
        let mut found = None;
        let _ = self.session.wait_for(&self.name, selector, &Condition::Visible, || {
            for element in driver.resolve(selector, &self.scope)? {
                match driver.is_visible(&element) {
                    Ok(true) => {
                        found = Some(element);
                        return Ok(true);
                    }
                    Ok(false) | Err(NavError::StaleElement { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(false)
        })?;
        found.ok_or_else(|| NavError::Driver {
            message: format!("boundary {selector} vanished while pinning {}", self.name),
        })
    }
}

/// A navigable node
///
/// Implementors provide [`core`](Node::core); everything else has a default.
pub trait Node: Sized {
    /// Shared node state
    fn core(&self) -> &NodeCore;

    /// Node identity
    fn id(&self) -> NodeId {
        self.core().id()
    }

    /// Node name
    fn name(&self) -> &str {
        self.core().name()
    }

    /// Live session
    fn session(&self) -> &Session {
        self.core().session()
    }

    /// Context boundary; [`Scope::Root`] when the node covers the whole
    /// application
    fn context(&self) -> &Scope {
        self.core().scope()
    }

    /// Control registry
    fn elements(&self) -> &ControlRegistry {
        self.core().registry()
    }

    /// First element of a control, once present
    fn get(&self, id: ControlId) -> NavResult<ElementHandle> {
        self.core().get(id)
    }

    /// Click a control once it is clickable
    fn click(self, id: ControlId) -> NavResult<Self> {
        self.core().click(id)?;
        Ok(self)
    }

    /// Replace a control's value once it is clickable
    fn set_value(self, id: ControlId, value: &str) -> NavResult<Self> {
        self.core().set_value(id, value)?;
        Ok(self)
    }

    /// Wait until `condition` holds for a control
    fn ensure(self, id: ControlId, condition: Condition) -> NavResult<Self> {
        self.core().ensure(id, &condition)?;
        Ok(self)
    }

    /// Text of a visible control
    fn read_text(&self, id: ControlId) -> NavResult<String> {
        self.core().read_text(id)
    }

    /// Attribute of a present control
    fn attribute(&self, id: ControlId, name: &str) -> NavResult<Option<String>> {
        self.core().attribute(id, name)
    }

    /// Whether a control is currently present
    fn is_present(&self, id: ControlId) -> NavResult<bool> {
        self.core().is_present(id)
    }

    /// Hover a visible control
    fn hover(self, id: ControlId) -> NavResult<Self> {
        self.core().hover(id)?;
        Ok(self)
    }

    /// Upload a file through a file input
    fn upload(self, id: ControlId, path: impl AsRef<Path>) -> NavResult<Self> {
        self.core().upload(id, path.as_ref())?;
        Ok(self)
    }

    /// Click `trigger` and attach a popup with this node as its parent
    fn open_popup(self, trigger: ControlId, config: PopupConfig) -> NavResult<Popup<Self>> {
        self.core().click(trigger)?;
        Popup::attach(self, config)
    }

    /// Attach a combobox inside this node and click its toggle to open it
    fn open_combobox(self, config: ComboboxConfig) -> NavResult<Combobox<Self>> {
        let combobox = Combobox::attach(self, config)?;
        combobox.core().click(combobox.toggle())?;
        Ok(combobox)
    }

    /// Click `trigger`, leave this node and build the destination
    fn navigate<N, F>(self, trigger: ControlId, build: F) -> NavResult<N>
    where
        N: Node,
        F: FnOnce(Session) -> NavResult<N>,
    {
        self.core().click(trigger)?;
        let session = self.session().clone();
        tracing::debug!(from = %self.name(), via = %trigger, "navigate");
        drop(self);
        build(session)
    }
}

/// Plain node for screens and sections
#[derive(Debug, Clone)]
pub struct Screen {
    core: NodeCore,
}

impl Screen {
    /// Wrap a built core
    #[must_use]
    pub const fn new(core: NodeCore) -> Self {
        Self { core }
    }

    /// Start building a screen named `name`
    #[must_use]
    pub fn builder(session: Session, name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(session, name)
    }
}

impl From<NodeCore> for Screen {
    fn from(core: NodeCore) -> Self {
        Self::new(core)
    }
}

impl Node for Screen {
    fn core(&self) -> &NodeCore {
        &self.core
    }
}
