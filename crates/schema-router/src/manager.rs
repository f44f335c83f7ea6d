//! The responder manager facade.
//!
//! One of these is constructed at application start and handed to whatever
//! needs to open schema URLs; there is no process-wide singleton. Shared
//! registrations live in a parent [`SchemaRegistry`] the host may pass to
//! several managers; each manager's own registrations shadow the shared
//! ones.

use crate::alert::AlertFactory;
use crate::dispatcher::{
    DispatchError, DispatchOutcome, Dispatcher, NavigationContext, PendingCompletion,
};
use crate::factory::ScreenFactory;
use crate::registry::SchemaRegistry;
use crate::resolver::resolve;
use schema_url::SchemaDescriptor;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};
use ui_shell::{ControllerRef, NavigationRef, RunLoop, TabBarRef};

/// Platform capability for URLs outside the app's own scheme.
///
/// `can_open` backs [`ResponderSchemaManager::can_open_url`] for foreign
/// schemes; `open` is the hand-off when such a URL is actually opened. The
/// default refuses both.
pub trait ExternalOpener {
    /// Whether the platform could open this foreign URL.
    fn can_open(&self, url: &str) -> bool;

    /// Open the foreign URL. Returns whether the hand-off succeeded.
    fn open(&self, _url: &str) -> bool {
        false
    }
}

struct ManagerInner {
    app_scheme: String,
    context: RefCell<NavigationContext>,
    registry: Rc<SchemaRegistry>,
    run_loop: RunLoop,
    external: RefCell<Option<Rc<dyn ExternalOpener>>>,
}

/// Process-wide coordinator for schema-driven navigation.
///
/// Cheap to clone; clones share state, so completion chains can re-enter
/// `open_url` through a weak handle without keeping the manager alive.
#[derive(Clone)]
pub struct ResponderSchemaManager {
    inner: Rc<ManagerInner>,
}

impl std::fmt::Debug for ResponderSchemaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponderSchemaManager")
            .field("app_scheme", &self.inner.app_scheme)
            .field("registry", &self.inner.registry)
            .finish()
    }
}

impl ResponderSchemaManager {
    /// Create a manager for the given app scheme with its own registry.
    ///
    /// The built-in `alert` handler is registered by default.
    pub fn new(app_scheme: impl Into<String>, run_loop: RunLoop) -> Self {
        Self::build(app_scheme.into(), run_loop, Rc::new(SchemaRegistry::new()))
    }

    /// Create a manager whose lookups fall back to a shared registry.
    pub fn with_shared_registry(
        app_scheme: impl Into<String>,
        run_loop: RunLoop,
        shared: Rc<SchemaRegistry>,
    ) -> Self {
        let registry = Rc::new(SchemaRegistry::with_parent(shared));
        Self::build(app_scheme.into(), run_loop, registry)
    }

    fn build(app_scheme: String, run_loop: RunLoop, registry: Rc<SchemaRegistry>) -> Self {
        registry.register_factory(Rc::new(AlertFactory));
        Self {
            inner: Rc::new(ManagerInner {
                app_scheme,
                context: RefCell::new(NavigationContext::new()),
                registry,
                run_loop,
                external: RefCell::new(None),
            }),
        }
    }

    /// The scheme this manager answers to.
    pub fn app_scheme(&self) -> &str {
        &self.inner.app_scheme
    }

    /// The run loop delayed dispatch and completions are scheduled on.
    pub fn run_loop(&self) -> &RunLoop {
        &self.inner.run_loop
    }

    /// This manager's registry (instance entries plus any shared parent).
    pub fn registry(&self) -> &SchemaRegistry {
        &self.inner.registry
    }

    /// Register a factory under an explicit identifier.
    pub fn register_schema(&self, identifier: &str, factory: Rc<dyn ScreenFactory>) {
        self.inner.registry.register(identifier, factory);
    }

    /// Register a factory under its own identifier.
    pub fn register_factory(&self, factory: Rc<dyn ScreenFactory>) {
        self.inner.registry.register_factory(factory);
    }

    /// Remove a registration; already-dispatched screens are unaffected.
    pub fn unregister_schema(&self, identifier: &str) {
        self.inner.registry.unregister(identifier);
    }

    /// Install the platform hand-off for foreign schemes.
    pub fn set_external_opener(&self, opener: Rc<dyn ExternalOpener>) {
        *self.inner.external.borrow_mut() = Some(opener);
    }

    /// Point the router at the currently visible view controller. Stored
    /// weakly; the host keeps ownership.
    pub fn set_view_controller(&self, controller: &ControllerRef) {
        self.inner
            .context
            .borrow_mut()
            .set_view_controller(controller);
    }

    /// Point the router at the active navigation controller.
    pub fn set_navigation_controller(&self, controller: &NavigationRef) {
        self.inner
            .context
            .borrow_mut()
            .set_navigation_controller(controller);
    }

    /// Point the router at the tab bar controller.
    pub fn set_tab_bar_controller(&self, controller: &TabBarRef) {
        self.inner
            .context
            .borrow_mut()
            .set_tab_bar_controller(controller);
    }

    /// Whether a URL is openable: its scheme matches the app scheme, or
    /// the external opener claims the foreign scheme.
    pub fn can_open_url(&self, url: &str) -> bool {
        if self.is_app_scheme(url) {
            return true;
        }
        match self.inner.external.borrow().as_ref() {
            Some(external) => external.can_open(url),
            None => false,
        }
    }

    /// Open a schema URL. Returns whether anything happened.
    pub fn open_url(&self, url: &str) -> bool {
        self.open_url_full(url, None, None)
    }

    /// Open a schema URL, then open `completion` once the primary
    /// navigation completes.
    pub fn open_url_with_completion(&self, url: &str, completion: &str) -> bool {
        self.open_url_full(url, Some(completion), None)
    }

    /// Open a schema URL, then open `view_did_appear` when the shown
    /// screen next appears.
    pub fn open_url_with_view_did_appear(&self, url: &str, view_did_appear: &str) -> bool {
        self.open_url_full(url, None, Some(view_did_appear))
    }

    /// Open a schema URL with both secondary hooks.
    pub fn open_url_full(
        &self,
        url: &str,
        completion: Option<&str>,
        view_did_appear: Option<&str>,
    ) -> bool {
        let pending = PendingCompletion {
            completion: completion.map(str::to_string),
            view_did_appear: view_did_appear.map(str::to_string),
        };
        match self.try_open_url(url, pending) {
            Ok(outcome) => {
                debug!(url, ?outcome, "schema url opened");
                true
            }
            Err(error) => {
                warn!(url, %error, "schema url not opened");
                false
            }
        }
    }

    /// The structured variant of [`Self::open_url`]: parse, resolve and
    /// dispatch, surfacing the failure reason the boolean surface hides.
    pub fn try_open_url(
        &self,
        url: &str,
        pending: PendingCompletion,
    ) -> Result<DispatchOutcome, DispatchError> {
        if !self.is_app_scheme(url) {
            let scheme = url.split_once("://").map(|(s, _)| s).unwrap_or("").to_string();
            let handed_off = self
                .inner
                .external
                .borrow()
                .as_ref()
                .is_some_and(|external| external.open(url));
            return if handed_off {
                Ok(DispatchOutcome::OpenedExternally)
            } else {
                Err(DispatchError::ForeignScheme(scheme))
            };
        }

        let descriptor = SchemaDescriptor::parse(url);
        let action = resolve(&descriptor, &self.inner.registry);
        let context = self.inner.context.borrow().clone();
        self.dispatcher()
            .dispatch(action, &descriptor, context, pending)
    }

    /// Host lifecycle hook: the given screen finished appearing. Consumes
    /// its pending appear schema, if any, and opens it through the normal
    /// path. Returns whether a schema was opened.
    pub fn notify_view_did_appear(&self, controller: &ControllerRef) -> bool {
        let schema = controller.borrow_mut().mark_view_did_appear();
        match schema {
            Some(url) => self.open_url(&url),
            None => false,
        }
    }

    fn is_app_scheme(&self, url: &str) -> bool {
        url.split_once("://")
            .map(|(scheme, _)| scheme.eq_ignore_ascii_case(&self.inner.app_scheme))
            .unwrap_or(false)
    }

    fn dispatcher(&self) -> Dispatcher {
        let weak: Weak<ManagerInner> = Rc::downgrade(&self.inner);
        let opener = Rc::new(move |url: &str| match weak.upgrade() {
            Some(inner) => ResponderSchemaManager { inner }.open_url(url),
            None => false,
        });
        Dispatcher::new(self.inner.run_loop.clone(), opener)
    }
}
