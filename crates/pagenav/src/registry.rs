//! Control Registry
//!
//! Per-node mapping from [`ControlId`] to a [`Resolver`] that produces live
//! element handles. Every registry carries the context boundary of the node
//! that owns it; scoped resolvers never look outside that boundary.
//!
//! ## Toyota Way Application
//!
//! - **Poka-Yoke**: asking for a control the node never declared is a
//!   [`NavError::Lookup`], never an empty handle
//! - **Genchi Genbutsu**: resolvers are re-run on every lookup, so the
//!   handle reflects the interface as it is now

use crate::control::ControlId;
use crate::driver::ElementHandle;
use crate::locator::{Scope, Selector};
use crate::result::{LookupReason, NavError, NavResult};
use crate::session::Session;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolution function for [`Resolver::Custom`]
pub type ResolveFn = dyn Fn(&Session, &Scope) -> NavResult<Vec<ElementHandle>> + Send + Sync;

/// How a control turns into live element handles
#[derive(Clone)]
pub enum Resolver {
    /// Lazy lookup inside the owning node's boundary
    Scoped(Selector),
    /// Lazy lookup across the whole document, for widgets rendered outside
    /// any node's boundary
    Global(Selector),
    /// Handle resolved eagerly at construction
    Fixed(ElementHandle),
    /// Arbitrary lookup, given the session and the owning node's boundary
    Custom(Arc<ResolveFn>),
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scoped(s) => f.debug_tuple("Scoped").field(s).finish(),
            Self::Global(s) => f.debug_tuple("Global").field(s).finish(),
            Self::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Resolver {
    /// Scoped CSS lookup
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Scoped(Selector::css(selector))
    }

    /// Scoped test-id lookup
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::Scoped(Selector::test_id(id))
    }

    /// Document-wide lookup
    #[must_use]
    pub const fn global(selector: Selector) -> Self {
        Self::Global(selector)
    }

    /// Custom lookup function
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Session, &Scope) -> NavResult<Vec<ElementHandle>> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Run the resolver against the live interface
    pub fn resolve(&self, session: &Session, scope: &Scope) -> NavResult<Vec<ElementHandle>> {
        match self {
            Self::Scoped(selector) => session.driver().resolve(selector, scope),
            Self::Global(selector) => session.driver().resolve(selector, &Scope::Root),
            Self::Fixed(handle) => Ok(vec![handle.clone()]),
            Self::Custom(f) => f(session, scope),
        }
    }
}

impl From<Selector> for Resolver {
    fn from(selector: Selector) -> Self {
        Self::Scoped(selector)
    }
}

/// Mapping from control identifier to resolver, bound to one boundary
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    owner: String,
    scope: Scope,
    entries: HashMap<ControlId, Resolver>,
}

impl ControlRegistry {
    /// Create an empty registry for `owner`, resolving inside `scope`
    #[must_use]
    pub fn new(owner: impl Into<String>, scope: Scope) -> Self {
        Self {
            owner: owner.into(),
            scope,
            entries: HashMap::new(),
        }
    }

    /// Bind `id` to `resolver`, returning the binding it replaced
    pub fn register(&mut self, id: ControlId, resolver: impl Into<Resolver>) -> Option<Resolver> {
        self.entries.insert(id, resolver.into())
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with(mut self, id: ControlId, resolver: impl Into<Resolver>) -> Self {
        let _ = self.register(id, resolver);
        self
    }

    /// All base entries plus `own`'s entries; `own` wins on identical ids.
    ///
    /// The result keeps `own`'s owner and boundary, so inherited controls
    /// resolve inside the specialized node.
    #[must_use]
    pub fn merge(base: &Self, own: Self) -> Self {
        let mut entries = base.entries.clone();
        entries.extend(own.entries);
        Self {
            owner: own.owner,
            scope: own.scope,
            entries,
        }
    }

    /// Name of the node this registry belongs to
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Context boundary for scoped lookups
    #[must_use]
    pub const fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Whether `id` is registered
    #[must_use]
    pub fn contains(&self, id: ControlId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Resolver bound to `id`
    #[must_use]
    pub fn resolver(&self, id: ControlId) -> Option<&Resolver> {
        self.entries.get(&id)
    }

    /// Registered ids, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<ControlId> {
        let mut ids: Vec<_> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of registered controls
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every element `id` currently resolves to (possibly none)
    ///
    /// # Errors
    ///
    /// [`NavError::Lookup`] if `id` is unregistered; driver errors wrapped
    /// with this registry's owner and `id`
    pub fn resolve_all(&self, session: &Session, id: ControlId) -> NavResult<Vec<ElementHandle>> {
        let resolver = self
            .entries
            .get(&id)
            .ok_or_else(|| self.lookup_error(id, LookupReason::Unregistered))?;
        resolver
            .resolve(session, &self.scope)
            .map_err(|e| e.at(&self.owner, id))
    }

    /// First element `id` currently resolves to
    ///
    /// # Errors
    ///
    /// [`NavError::Lookup`] if `id` is unregistered or resolves to nothing
    pub fn get(&self, session: &Session, id: ControlId) -> NavResult<ElementHandle> {
        self.resolve_all(session, id)?
            .into_iter()
            .next()
            .ok_or_else(|| self.lookup_error(id, LookupReason::NoMatch))
    }

    fn lookup_error(&self, control: ControlId, reason: LookupReason) -> NavError {
        NavError::Lookup {
            node: self.owner.clone(),
            control,
            reason,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};

    fn form_session() -> (MockDriver, Session) {
        let driver = MockDriver::new();
        let _ = driver.add(MockElement::new("form", "form").matching(Selector::css("form")));
        let _ = driver.add(
            MockElement::new("form-name", "input")
                .child_of("form")
                .matching(Selector::css("input.name")),
        );
        let _ = driver.add(
            MockElement::new("search-name", "input").matching(Selector::css("input.name")),
        );
        let _ = driver.add(
            MockElement::new("toast", "div").matching(Selector::css(".toast")),
        );
        (driver.clone(), Session::new(driver))
    }

    fn form_scope() -> Scope {
        Scope::element(ElementHandle::new("form", "form"))
    }

    mod registration_tests {
        use super::*;

        #[test]
        fn test_register_returns_previous() {
            let mut reg = ControlRegistry::new("Form", Scope::Root);
            assert!(reg.register(ControlId::Name, Resolver::css("a")).is_none());
            let previous = reg.register(ControlId::Name, Resolver::css("b"));
            assert!(matches!(previous, Some(Resolver::Scoped(Selector::Css(ref s))) if s == "a"));
            assert_eq!(reg.len(), 1);
        }

        #[test]
        fn test_ids_sorted() {
            let reg = ControlRegistry::new("Form", Scope::Root)
                .with(ControlId::Save, Resolver::css("s"))
                .with(ControlId::Name, Resolver::css("n"));
            assert_eq!(reg.ids(), vec![ControlId::Name, ControlId::Save]);
            assert!(reg.contains(ControlId::Save));
            assert!(!reg.contains(ControlId::Delete));
        }

        #[test]
        fn test_empty() {
            let reg = ControlRegistry::default();
            assert!(reg.is_empty());
            assert!(reg.scope().is_root());
        }
    }

    mod merge_tests {
        use super::*;

        #[test]
        fn test_own_entries_override() {
            let base = ControlRegistry::new("Base", Scope::Root)
                .with(ControlId::Name, Resolver::css("base-name"))
                .with(ControlId::Cancel, Resolver::css("base-cancel"));
            let own = ControlRegistry::new("Special", form_scope())
                .with(ControlId::Name, Resolver::css("own-name"))
                .with(ControlId::Create, Resolver::css("own-create"));
            let merged = ControlRegistry::merge(&base, own);

            assert_eq!(merged.owner(), "Special");
            assert_eq!(merged.scope(), &form_scope());
            assert_eq!(
                merged.ids(),
                vec![ControlId::Name, ControlId::Cancel, ControlId::Create]
            );
            assert!(matches!(
                merged.resolver(ControlId::Name),
                Some(Resolver::Scoped(Selector::Css(s))) if s == "own-name"
            ));
            assert!(matches!(
                merged.resolver(ControlId::Cancel),
                Some(Resolver::Scoped(Selector::Css(s))) if s == "base-cancel"
            ));
        }

        #[test]
        fn test_inherited_controls_resolve_like_base() {
            let (_, session) = form_session();
            let base = ControlRegistry::new("Base", form_scope())
                .with(ControlId::Name, Resolver::css("input.name"))
                .with(ControlId::Custom("toast"), Resolver::global(Selector::css(".toast")));
            let own = ControlRegistry::new("Special", form_scope())
                .with(ControlId::Save, Resolver::css("button.save"));
            let merged = ControlRegistry::merge(&base, own);

            for id in base.ids() {
                assert_eq!(
                    merged.get(&session, id).unwrap().id,
                    base.get(&session, id).unwrap().id,
                    "{id}"
                );
            }
            assert_eq!(merged.get(&session, ControlId::Name).unwrap().id, "form-name");
        }

        #[test]
        fn test_base_untouched() {
            let base = ControlRegistry::new("Base", Scope::Root).with(ControlId::Ok, Resolver::css("ok"));
            let _ = ControlRegistry::merge(
                &base,
                ControlRegistry::new("Own", Scope::Root).with(ControlId::Ok, Resolver::css("yes")),
            );
            assert!(matches!(
                base.resolver(ControlId::Ok),
                Some(Resolver::Scoped(Selector::Css(s))) if s == "ok"
            ));
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_unregistered_is_lookup_error() {
            let (_, session) = form_session();
            let reg = ControlRegistry::new("Form", form_scope());
            let err = reg.get(&session, ControlId::Save).unwrap_err();
            assert!(matches!(
                err,
                NavError::Lookup { reason: LookupReason::Unregistered, control: ControlId::Save, ref node } if node == "Form"
            ));
        }

        #[test]
        fn test_no_match_is_lookup_error() {
            let (_, session) = form_session();
            let reg = ControlRegistry::new("Form", form_scope()).with(ControlId::Save, Resolver::css("button.save"));
            let err = reg.get(&session, ControlId::Save).unwrap_err();
            assert!(matches!(err, NavError::Lookup { reason: LookupReason::NoMatch, .. }));
        }

        #[test]
        fn test_scoped_lookup_stays_in_boundary() {
            let (_, session) = form_session();
            let reg = ControlRegistry::new("Form", form_scope()).with(ControlId::Name, Resolver::css("input.name"));
            assert_eq!(reg.get(&session, ControlId::Name).unwrap().id, "form-name");
            assert_eq!(reg.resolve_all(&session, ControlId::Name).unwrap().len(), 1);
        }

        #[test]
        fn test_global_lookup_crosses_boundary() {
            let (_, session) = form_session();
            let reg = ControlRegistry::new("Form", form_scope())
                .with(ControlId::Custom("toast"), Resolver::global(Selector::css(".toast")));
            assert_eq!(reg.get(&session, ControlId::Custom("toast")).unwrap().id, "toast");
        }

        #[test]
        fn test_fixed_and_custom_resolvers() {
            let (_, session) = form_session();
            let reg = ControlRegistry::new("Form", form_scope())
                .with(ControlId::Value, Resolver::Fixed(ElementHandle::new("pinned", "span")))
                .with(
                    ControlId::Search,
                    Resolver::custom(|session, _scope| {
                        session.driver().resolve(&Selector::css("input.name"), &Scope::Root)
                    }),
                );
            assert_eq!(reg.get(&session, ControlId::Value).unwrap().id, "pinned");
            assert_eq!(reg.resolve_all(&session, ControlId::Search).unwrap().len(), 2);
        }

        #[test]
        fn test_stale_boundary_is_wrapped_with_context() {
            let (driver, session) = form_session();
            let reg = ControlRegistry::new("Form", form_scope()).with(ControlId::Name, Resolver::css("input.name"));
            driver.remove("form");
            let err = reg.get(&session, ControlId::Name).unwrap_err();
            assert!(err.is_stale());
            assert!(matches!(err, NavError::Step { control: ControlId::Name, .. }));
        }

        #[test]
        fn test_debug_hides_custom_fn() {
            let r = Resolver::custom(|_, _| Ok(Vec::new()));
            assert_eq!(format!("{r:?}"), "Custom(..)");
        }
    }
}
