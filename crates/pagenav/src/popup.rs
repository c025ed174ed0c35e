//! Modal dialogs
//!
//! One generic [`Popup<P>`] covers every dialog. A concrete dialog is a
//! [`PopupConfig`]: its boundary, its controls and what "confirm" and
//! "dismiss" mean for it. The popup owns its parent and hands it back from
//! [`ok`](Popup::ok), [`cancel`](Popup::cancel) and
//! [`close_all`](Popup::close_all). All three consume the popup, so a dialog
//! cannot be closed twice.

use crate::control::ControlId;
use crate::locator::Selector;
use crate::node::{Node, NodeBuilder, NodeCore, NodeKind};
use crate::registry::{ControlRegistry, Resolver};
use crate::result::{NavError, NavResult};
use crate::wait::Condition;
use std::sync::Arc;

/// Custom confirm or dismiss behavior, run against the popup's own core
pub type ActionFn = dyn Fn(&NodeCore) -> NavResult<()> + Send + Sync;

/// What confirming or dismissing a popup does
#[derive(Clone)]
pub enum Action {
    /// Click one of the popup's controls
    Click(ControlId),
    /// Run a callback
    Custom(Arc<ActionFn>),
}

impl Action {
    /// Wrap a callback
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&NodeCore) -> NavResult<()> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    fn perform(&self, core: &NodeCore) -> NavResult<()> {
        match self {
            Self::Click(id) => core.click(*id),
            Self::Custom(f) => f(core),
        }
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Click(id) => f.debug_tuple("Click").field(id).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Which action [`Popup::close_all`] performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Teardown {
    /// Same as `ok`
    #[default]
    Confirm,
    /// Same as `cancel`
    Dismiss,
}

/// Definition of one concrete dialog
#[derive(Debug, Clone)]
pub struct PopupConfig {
    name: String,
    boundary: Selector,
    base: Option<ControlRegistry>,
    controls: Vec<(ControlId, Resolver)>,
    confirm: Action,
    dismiss: Action,
    teardown: Teardown,
    wait_closed: bool,
}

impl PopupConfig {
    /// Dialog `name` bounded by the element `boundary` finds in the document.
    ///
    /// Confirm clicks [`ControlId::Ok`], dismiss clicks [`ControlId::Cancel`].
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: Selector) -> Self {
        Self {
            name: name.into(),
            boundary,
            base: None,
            controls: Vec::new(),
            confirm: Action::Click(ControlId::Ok),
            dismiss: Action::Click(ControlId::Cancel),
            teardown: Teardown::Confirm,
            wait_closed: false,
        }
    }

    /// Register a control inside the dialog
    #[must_use]
    pub fn control(mut self, id: ControlId, resolver: impl Into<Resolver>) -> Self {
        self.controls.push((id, resolver.into()));
        self
    }

    /// Inherit controls from a shared registry
    #[must_use]
    pub fn extend(mut self, base: &ControlRegistry) -> Self {
        self.base = Some(match self.base.take() {
            Some(earlier) => ControlRegistry::merge(&earlier, base.clone()),
            None => base.clone(),
        });
        self
    }

    /// Override the confirm action
    #[must_use]
    pub fn confirm(mut self, action: Action) -> Self {
        self.confirm = action;
        self
    }

    /// Override the dismiss action
    #[must_use]
    pub fn dismiss(mut self, action: Action) -> Self {
        self.dismiss = action;
        self
    }

    /// Choose what `close_all` does
    #[must_use]
    pub const fn teardown(mut self, teardown: Teardown) -> Self {
        self.teardown = teardown;
        self
    }

    /// After confirm or dismiss, wait for the dialog to disappear before
    /// returning the parent
    #[must_use]
    pub const fn wait_until_closed(mut self, wait: bool) -> Self {
        self.wait_closed = wait;
        self
    }

    /// Dialog name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A modal dialog that returns to `P`
#[derive(Debug)]
pub struct Popup<P: Node> {
    core: NodeCore,
    parent: P,
    confirm: Action,
    dismiss: Action,
    teardown: Teardown,
    wait_closed: bool,
}

impl<P: Node> Popup<P> {
    /// Attach to a dialog that is already open (or opening)
    ///
    /// # Errors
    ///
    /// [`NavError::Timeout`] if the dialog boundary never becomes visible
    pub fn attach(parent: P, config: PopupConfig) -> NavResult<Self> {
        let mut builder = NodeBuilder::new(parent.session().clone(), config.name)
            .kind(NodeKind::Popup)
            .within(config.boundary);
        if let Some(base) = &config.base {
            builder = builder.extend(base);
        }
        for (id, resolver) in config.controls {
            builder = builder.control(id, resolver);
        }
        let core = builder.build()?;
        tracing::debug!(popup = %core.name(), parent = %parent.name(), "popup attached");

        Ok(Self {
            core,
            parent,
            confirm: config.confirm,
            dismiss: config.dismiss,
            teardown: config.teardown,
            wait_closed: config.wait_closed,
        })
    }

    /// Node this popup returns to
    #[must_use]
    pub const fn parent(&self) -> &P {
        &self.parent
    }

    /// Confirm and return the parent
    pub fn ok(self) -> NavResult<P> {
        self.finish(Teardown::Confirm)
    }

    /// Dismiss and return the parent
    pub fn cancel(self) -> NavResult<P> {
        self.finish(Teardown::Dismiss)
    }

    /// Leave the dialog the configured way and return the parent
    pub fn close_all(self) -> NavResult<P> {
        let teardown = self.teardown;
        self.finish(teardown)
    }

    fn finish(self, how: Teardown) -> NavResult<P> {
        let action = match how {
            Teardown::Confirm => &self.confirm,
            Teardown::Dismiss => &self.dismiss,
        };
        tracing::debug!(
            popup = %self.core.name(),
            parent = %self.parent.name(),
            ?how,
            "closing popup"
        );
        action.perform(&self.core)?;
        if self.wait_closed {
            self.wait_gone()?;
        }
        Ok(self.parent)
    }

    fn wait_gone(&self) -> NavResult<()> {
        let Some(boundary) = self.core.scope().handle() else {
            return Ok(());
        };
        let session = self.core.session();
        let _ = session.wait_for(self.core.name(), boundary, &Condition::Hidden, || {
            match session.driver().is_visible(boundary) {
                Ok(visible) => Ok(!visible),
                Err(NavError::StaleElement { .. }) => Ok(true),
                Err(e) => Err(e),
            }
        })?;
        Ok(())
    }
}

impl<P: Node> Node for Popup<P> {
    fn core(&self) -> &NodeCore {
        &self.core
    }
}

/// Dialog wrappers that close like a [`Popup`]
///
/// Implement [`into_popup`](PopupNode::into_popup) on a newtype around
/// `Popup<P>` to get `ok`, `cancel` and `close_all`.
pub trait PopupNode: Node {
    /// Node the dialog returns to
    type Parent: Node;

    /// The underlying popup
    fn into_popup(self) -> Popup<Self::Parent>;

    /// Confirm and return the parent
    fn ok(self) -> NavResult<Self::Parent> {
        self.into_popup().ok()
    }

    /// Dismiss and return the parent
    fn cancel(self) -> NavResult<Self::Parent> {
        self.into_popup().cancel()
    }

    /// Leave the dialog the configured way and return the parent
    fn close_all(self) -> NavResult<Self::Parent> {
        self.into_popup().close_all()
    }
}

impl<P: Node> PopupNode for Popup<P> {
    type Parent = P;

    fn into_popup(self) -> Popup<P> {
        self
    }
}
