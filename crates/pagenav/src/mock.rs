//! Mock driver for unit and scenario testing
//!
//! An in-memory element tree implementing [`Driver`]. It understands
//! scoping (descendant lookup), inherited visibility, stale handles and
//! click side effects, and records every interaction so tests can assert
//! exactly which controls were touched and how often.
//!
//! Selector matching is declarative: an element matches the selectors it was
//! declared with via [`MockElement::matching`]. [`Selector::Text`] and
//! [`Selector::CssWithText`] additionally match on the element's own text.

use crate::driver::{Driver, ElementHandle};
use crate::locator::{Scope, Selector};
use crate::result::{NavError, NavResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// One element of the mock interface tree
#[derive(Debug, Clone)]
pub struct MockElement {
    id: String,
    tag_name: String,
    parent: Option<String>,
    selectors: Vec<Selector>,
    text: String,
    visible: bool,
    enabled: bool,
    attributes: HashMap<String, String>,
    alive: bool,
}

impl MockElement {
    /// Create a visible, enabled element
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            parent: None,
            selectors: Vec::new(),
            text: String::new(),
            visible: true,
            enabled: true,
            attributes: HashMap::new(),
            alive: true,
        }
    }

    /// Declare a selector this element matches
    #[must_use]
    pub fn matching(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Nest under another element
    #[must_use]
    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set visible text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set visibility
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set enabled state
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Handle referring to this element
    #[must_use]
    pub fn handle(&self) -> ElementHandle {
        ElementHandle::new(self.id.clone(), self.tag_name.clone())
    }

    fn matches(&self, selector: &Selector) -> bool {
        if self.selectors.contains(selector) {
            return true;
        }
        match selector {
            Selector::Text(t) => !self.text.is_empty() && self.text.contains(t.as_str()),
            Selector::CssWithText { css, text } => {
                self.selectors.contains(&Selector::Css(css.clone()))
                    && self.text.contains(text.as_str())
            }
            _ => false,
        }
    }
}

/// Kind of recorded interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    /// Element was clicked
    Click,
    /// Element value was cleared
    Clear,
    /// Text was typed
    Type(String),
    /// Pointer hovered
    Hover,
    /// File was uploaded
    Upload(PathBuf),
}

/// One recorded interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    /// Target element id
    pub element: String,
    /// What happened
    pub action: MockAction,
}

/// Interface mutation triggered by clicking an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Make an element visible
    Show(String),
    /// Hide an element (and, transitively, its descendants)
    Hide(String),
    /// Remove an element and its descendants; old handles go stale
    Remove(String),
    /// Replace an element's text
    SetText(String, String),
}

#[derive(Debug, Default)]
struct MockState {
    elements: Vec<MockElement>,
    log: Vec<Interaction>,
    effects: HashMap<String, Vec<Effect>>,
}

impl MockState {
    fn find(&self, id: &str) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut MockElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    fn live(&self, handle: &ElementHandle) -> NavResult<&MockElement> {
        self.find(&handle.id)
            .filter(|e| e.alive)
            .ok_or_else(|| NavError::StaleElement {
                element: handle.to_string(),
            })
    }

    fn is_descendant(&self, element: &MockElement, ancestor: &str) -> bool {
        let mut cursor = element.parent.as_deref();
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.find(id).and_then(|e| e.parent.as_deref());
        }
        false
    }

    fn rendered(&self, element: &MockElement) -> bool {
        let mut current = Some(element);
        while let Some(e) = current {
            if !e.visible {
                return false;
            }
            current = e.parent.as_deref().and_then(|p| self.find(p));
        }
        true
    }

    fn subtree(&self, root: &str) -> Vec<String> {
        self.elements
            .iter()
            .filter(|e| e.id == root || self.is_descendant(e, root))
            .map(|e| e.id.clone())
            .collect()
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Show(id) => {
                if let Some(e) = self.find_mut(id) {
                    e.visible = true;
                }
            }
            Effect::Hide(id) => {
                if let Some(e) = self.find_mut(id) {
                    e.visible = false;
                }
            }
            Effect::Remove(id) => {
                for gone in self.subtree(id) {
                    if let Some(e) = self.find_mut(&gone) {
                        e.alive = false;
                    }
                }
            }
            Effect::SetText(id, text) => {
                if let Some(e) = self.find_mut(id) {
                    e.text.clone_from(text);
                }
            }
        }
    }

    fn interactable(&self, handle: &ElementHandle, action: &str) -> NavResult<()> {
        let element = self.live(handle)?;
        if self.rendered(element) && element.enabled {
            Ok(())
        } else {
            Err(NavError::NotInteractable {
                element: handle.to_string(),
                action: action.to_string(),
            })
        }
    }

    fn record(&mut self, handle: &ElementHandle, action: MockAction) {
        self.log.push(Interaction {
            element: handle.id.clone(),
            action,
        });
    }
}

/// In-memory [`Driver`] with an interaction log
///
/// Clones share the same tree, so a test can keep one clone for assertions
/// after handing another to a [`Session`](crate::Session).
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create an empty mock interface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> NavResult<MutexGuard<'_, MockState>> {
        self.state.lock().map_err(|_| NavError::Driver {
            message: "mock driver state poisoned".to_string(),
        })
    }

    fn update(&self, f: impl FnOnce(&mut MockState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }

    fn read<T: Default>(&self, f: impl FnOnce(&MockState) -> T) -> T {
        self.state.lock().map(|s| f(&s)).unwrap_or_default()
    }

    /// Add an element (document order is insertion order) and return its handle
    pub fn add(&self, element: MockElement) -> ElementHandle {
        let handle = element.handle();
        self.update(|s| s.elements.push(element));
        handle
    }

    /// Register a side effect for clicks on `id`
    pub fn on_click(&self, id: impl Into<String>, effect: Effect) {
        let id = id.into();
        self.update(|s| s.effects.entry(id).or_default().push(effect));
    }

    /// Change visibility of an element
    pub fn set_visible(&self, id: &str, visible: bool) {
        let effect = if visible {
            Effect::Show(id.to_string())
        } else {
            Effect::Hide(id.to_string())
        };
        self.update(|s| s.apply(&effect));
    }

    /// Change enabled state of an element
    pub fn set_enabled(&self, id: &str, enabled: bool) {
        self.update(|s| {
            if let Some(e) = s.find_mut(id) {
                e.enabled = enabled;
            }
        });
    }

    /// Replace an element's text
    pub fn set_text(&self, id: &str, text: impl Into<String>) {
        let effect = Effect::SetText(id.to_string(), text.into());
        self.update(|s| s.apply(&effect));
    }

    /// Remove an element and its descendants
    pub fn remove(&self, id: &str) {
        let effect = Effect::Remove(id.to_string());
        self.update(|s| s.apply(&effect));
    }

    /// Every interaction so far, in order
    #[must_use]
    pub fn interactions(&self) -> Vec<Interaction> {
        self.read(|s| s.log.clone())
    }

    /// Number of clicks delivered to `id`
    #[must_use]
    pub fn clicks(&self, id: &str) -> usize {
        self.read(|s| {
            s.log
                .iter()
                .filter(|i| i.element == id && i.action == MockAction::Click)
                .count()
        })
    }

    /// Current `value` attribute of `id`
    #[must_use]
    pub fn value(&self, id: &str) -> Option<String> {
        self.read(|s| s.find(id).and_then(|e| e.attributes.get("value").cloned()))
    }

    /// Forget recorded interactions
    pub fn clear_log(&self) {
        self.update(|s| s.log.clear());
    }
}

impl Driver for MockDriver {
    fn resolve(&self, selector: &Selector, scope: &Scope) -> NavResult<Vec<ElementHandle>> {
        let state = self.state()?;
        if let Some(boundary) = scope.handle() {
            let _ = state.live(boundary)?;
        }
        Ok(state
            .elements
            .iter()
            .filter(|e| e.alive && e.matches(selector))
            .filter(|e| match scope {
                Scope::Root => true,
                Scope::Element(h) => state.is_descendant(e, &h.id),
            })
            .map(MockElement::handle)
            .collect())
    }

    fn is_visible(&self, element: &ElementHandle) -> NavResult<bool> {
        let state = self.state()?;
        let e = state.live(element)?;
        Ok(state.rendered(e))
    }

    fn is_enabled(&self, element: &ElementHandle) -> NavResult<bool> {
        Ok(self.state()?.live(element)?.enabled)
    }

    fn click(&self, element: &ElementHandle) -> NavResult<()> {
        let mut state = self.state()?;
        state.interactable(element, "click")?;
        state.record(element, MockAction::Click);
        let effects = state.effects.get(&element.id).cloned().unwrap_or_default();
        for effect in &effects {
            state.apply(effect);
        }
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> NavResult<()> {
        let mut state = self.state()?;
        state.interactable(element, "clear")?;
        state.record(element, MockAction::Clear);
        if let Some(e) = state.find_mut(&element.id) {
            let _ = e.attributes.insert("value".to_string(), String::new());
        }
        Ok(())
    }

    fn type_text(&self, element: &ElementHandle, text: &str) -> NavResult<()> {
        let mut state = self.state()?;
        state.interactable(element, "type")?;
        state.record(element, MockAction::Type(text.to_string()));
        if let Some(e) = state.find_mut(&element.id) {
            e.attributes
                .entry("value".to_string())
                .or_default()
                .push_str(text);
        }
        Ok(())
    }

    fn read_text(&self, element: &ElementHandle) -> NavResult<String> {
        Ok(self.state()?.live(element)?.text.clone())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> NavResult<Option<String>> {
        Ok(self.state()?.live(element)?.attributes.get(name).cloned())
    }

    fn upload_file(&self, element: &ElementHandle, path: &Path) -> NavResult<()> {
        let mut state = self.state()?;
        state.interactable(element, "upload")?;
        state.record(element, MockAction::Upload(path.to_path_buf()));
        Ok(())
    }

    fn hover(&self, element: &ElementHandle) -> NavResult<()> {
        let mut state = self.state()?;
        let _ = state.live(element)?;
        state.record(element, MockAction::Hover);
        Ok(())
    }
}
