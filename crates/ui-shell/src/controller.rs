//! View controllers and the containers that show them.
//!
//! The host application owns the strong references ([`ControllerRef`]); the
//! router holds only [`ControllerWeak`] handles and must tolerate any of
//! them being gone by the time it dispatches.

use crate::control::Control;
use schema_url::Params;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;
use uuid::Uuid;

/// Shared strong handle to a view controller.
pub type ControllerRef = Rc<RefCell<ViewController>>;

/// Non-owning handle to a view controller.
pub type ControllerWeak = Weak<RefCell<ViewController>>;

/// Shared strong handle to a navigation controller.
pub type NavigationRef = Rc<RefCell<NavigationController>>;

/// Non-owning handle to a navigation controller.
pub type NavigationWeak = Weak<RefCell<NavigationController>>;

/// Shared strong handle to a tab bar controller.
pub type TabBarRef = Rc<RefCell<TabBarController>>;

/// Non-owning handle to a tab bar controller.
pub type TabBarWeak = Weak<RefCell<TabBarController>>;

/// A record of one push or present transition, kept for observability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Name of the controller that was shown.
    pub name: String,
    /// Whether the transition was animated.
    pub animated: bool,
}

/// A single screen.
///
/// Mirrors the subset of view-controller behavior the router needs:
/// identity, embedded controls, modal presentation, the appear lifecycle,
/// and the pending appear-schema slot consumed by the router's completion
/// chain.
#[derive(Debug)]
pub struct ViewController {
    id: Uuid,
    name: String,
    controls: Vec<Control>,
    presented: Option<ControllerRef>,
    appeared: bool,
    view_did_appear_schema: Option<String>,
    received_params: Vec<Params>,
}

impl ViewController {
    /// Create a named screen with no controls.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            controls: Vec::new(),
            presented: None,
            appeared: false,
            view_did_appear_schema: None,
            received_params: Vec::new(),
        }
    }

    /// Create a named screen already wrapped for sharing.
    pub fn shared(name: impl Into<String>) -> ControllerRef {
        Rc::new(RefCell::new(Self::new(name)))
    }

    /// Stable per-instance identity.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The screen's name; compared case-insensitively against schema
    /// identifiers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a control to this screen.
    pub fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    /// Find a control by identifier, case-insensitively.
    pub fn control(&self, identifier: &str) -> Option<&Control> {
        self.controls
            .iter()
            .find(|c| c.identifier().eq_ignore_ascii_case(identifier))
    }

    /// Mutable variant of [`Self::control`].
    pub fn control_mut(&mut self, identifier: &str) -> Option<&mut Control> {
        self.controls
            .iter_mut()
            .find(|c| c.identifier().eq_ignore_ascii_case(identifier))
    }

    /// Present another screen modally over this one.
    pub fn present(&mut self, child: ControllerRef, animated: bool) {
        debug!(
            presenter = %self.name,
            presented = %child.borrow().name,
            animated,
            "presenting view controller"
        );
        self.presented = Some(child);
    }

    /// The screen currently presented over this one, if any.
    pub fn presented(&self) -> Option<&ControllerRef> {
        self.presented.as_ref()
    }

    /// Dismiss the presented screen, returning it.
    pub fn dismiss(&mut self) -> Option<ControllerRef> {
        self.presented.take()
    }

    /// Store the schema URL to open on the next appear lifecycle event.
    /// A later store replaces an unconsumed one.
    pub fn set_view_did_appear_schema(&mut self, url: impl Into<String>) {
        self.view_did_appear_schema = Some(url.into());
    }

    /// The pending appear schema, if one is stored.
    pub fn view_did_appear_schema(&self) -> Option<&str> {
        self.view_did_appear_schema.as_deref()
    }

    /// Record the appear lifecycle event, consuming the pending appear
    /// schema at most once.
    pub fn mark_view_did_appear(&mut self) -> Option<String> {
        self.appeared = true;
        self.view_did_appear_schema.take()
    }

    /// Whether the screen has appeared at least once.
    pub fn has_appeared(&self) -> bool {
        self.appeared
    }

    /// Deliver a schema param payload to this live screen (re-entrant deep
    /// link into an already-shown controller).
    pub fn receive_params(&mut self, params: Params) {
        self.received_params.push(params);
    }

    /// Param payloads delivered so far, oldest first.
    pub fn received_params(&self) -> &[Params] {
        &self.received_params
    }
}

/// Stack container pushing screens left to right.
#[derive(Debug, Default)]
pub struct NavigationController {
    stack: Vec<ControllerRef>,
    transitions: Vec<Transition>,
}

impl NavigationController {
    /// Create an empty navigation controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create one with a root screen already on the stack.
    pub fn with_root(root: ControllerRef) -> Self {
        Self {
            stack: vec![root],
            transitions: Vec::new(),
        }
    }

    /// Push a screen onto the stack.
    pub fn push(&mut self, controller: ControllerRef, animated: bool) {
        self.transitions.push(Transition {
            name: controller.borrow().name().to_string(),
            animated,
        });
        self.stack.push(controller);
    }

    /// Pop the top screen (the root never pops).
    pub fn pop(&mut self) -> Option<ControllerRef> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// The screen currently on top.
    pub fn top(&self) -> Option<&ControllerRef> {
        self.stack.last()
    }

    /// Stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Every push transition so far, oldest first.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

/// Tab container selecting one of a fixed set of screens.
#[derive(Debug, Default)]
pub struct TabBarController {
    tabs: Vec<ControllerRef>,
    selected_index: usize,
}

impl TabBarController {
    /// Create a tab bar controller over the given tabs.
    pub fn new(tabs: Vec<ControllerRef>) -> Self {
        Self {
            tabs,
            selected_index: 0,
        }
    }

    /// Number of tabs.
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// The currently selected index.
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// The currently selected screen, if any tabs exist.
    pub fn selected(&self) -> Option<&ControllerRef> {
        self.tabs.get(self.selected_index)
    }

    /// Select a tab, clamping an out-of-range index to the last valid tab.
    /// Returns false when there are no tabs to select.
    pub fn select(&mut self, index: usize) -> bool {
        if self.tabs.is_empty() {
            return false;
        }
        let clamped = index.min(self.tabs.len() - 1);
        if clamped != index {
            debug!(index, clamped, "clamping tab selection");
        }
        self.selected_index = clamped;
        true
    }
}
