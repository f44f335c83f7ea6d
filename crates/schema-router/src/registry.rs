//! Identifier-to-factory registry.
//!
//! A manager owns an instance registry and may chain it to a shared parent
//! (process-wide registrations done at startup). Lookup consults the
//! instance entries first, then the parent. Mutation is expected only from
//! the application's single initialization path; everything runs on the UI
//! thread, so a `RefCell` is all the synchronization there is.

use crate::factory::ScreenFactory;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Mapping from schema identifier to screen factory. Last registration
/// wins; keys match case-insensitively.
#[derive(Default)]
pub struct SchemaRegistry {
    entries: RefCell<HashMap<String, Rc<dyn ScreenFactory>>>,
    parent: Option<Rc<SchemaRegistry>>,
}

impl SchemaRegistry {
    /// Create an empty registry with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose lookups fall back to `parent`.
    pub fn with_parent(parent: Rc<SchemaRegistry>) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            parent: Some(parent),
        }
    }

    /// Register a factory under an explicit identifier, replacing any
    /// previous registration for it.
    pub fn register(&self, identifier: &str, factory: Rc<dyn ScreenFactory>) {
        let key = identifier.to_ascii_lowercase();
        debug!(identifier = %key, "registering schema factory");
        self.entries.borrow_mut().insert(key, factory);
    }

    /// Register a factory under its own identifier.
    pub fn register_factory(&self, factory: Rc<dyn ScreenFactory>) {
        let key = factory.identifier().to_ascii_lowercase();
        debug!(identifier = %key, "registering schema factory");
        self.entries.borrow_mut().insert(key, factory);
    }

    /// Remove a registration. Instances already dispatched are unaffected.
    pub fn unregister(&self, identifier: &str) {
        let key = identifier.to_ascii_lowercase();
        debug!(identifier = %key, "unregistering schema factory");
        self.entries.borrow_mut().remove(&key);
    }

    /// Look up a factory, instance entries before the parent's.
    pub fn lookup(&self, identifier: &str) -> Option<Rc<dyn ScreenFactory>> {
        let key = identifier.to_ascii_lowercase();
        if let Some(factory) = self.entries.borrow().get(&key) {
            return Some(factory.clone());
        }
        self.parent.as_ref().and_then(|p| p.lookup(&key))
    }

    /// Number of entries in this registry (parent not included).
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether this registry (parent not included) is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self.entries.borrow().keys().cloned().collect();
        keys.sort();
        f.debug_struct("SchemaRegistry")
            .field("identifiers", &keys)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
