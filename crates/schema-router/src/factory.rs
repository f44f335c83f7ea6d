//! Screen factories: the explicit replacement for dynamic class lookup.
//!
//! A factory describes one destination screen type. Registration happens
//! once at application startup; resolution consults the factory's
//! capability hooks instead of interrogating a live class hierarchy.

use schema_url::Params;
use ui_shell::ControllerRef;
use ui_shell::ViewController;

/// A destination screen type the router can instantiate.
///
/// `should_resolve` is the decline capability: a screen that does not want
/// to be schema-driven returns false and is only shown when the URL carries
/// `force=1`. The default accepts, so a factory that never overrides it is
/// always schema-drivable.
#[cfg_attr(test, mockall::automock)]
pub trait ScreenFactory {
    /// Bare type name matched case-insensitively against schema
    /// identifiers.
    fn identifier(&self) -> &str;

    /// Build a fresh screen for the given params. Returning `None` means
    /// the params were unusable and dispatch fails with an instantiation
    /// error.
    fn instantiate(&self, params: &Params) -> Option<ControllerRef>;

    /// Whether this screen agrees to be shown for the given params.
    fn should_resolve(&self, _params: &Params) -> bool {
        true
    }

    /// Deliver params to an already-visible instance of this screen
    /// instead of stacking a duplicate.
    fn resolve_params(&self, existing: &ControllerRef, params: &Params) {
        existing.borrow_mut().receive_params(params.clone());
    }
}

/// Closure-based factory for application setup code.
///
/// Most screens need nothing beyond "make a controller named like me", so
/// registration usually looks like
/// `FnScreenFactory::new("login", |_| Some(ViewController::shared("login")))`.
pub struct FnScreenFactory {
    identifier: String,
    build: Box<dyn Fn(&Params) -> Option<ControllerRef>>,
    should_resolve: Option<Box<dyn Fn(&Params) -> bool>>,
}

impl FnScreenFactory {
    /// Create a factory with the given identifier and build closure.
    pub fn new(
        identifier: impl Into<String>,
        build: impl Fn(&Params) -> Option<ControllerRef> + 'static,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            build: Box::new(build),
            should_resolve: None,
        }
    }

    /// Shorthand for a screen that always instantiates under its own name.
    pub fn plain(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let name = identifier.clone();
        Self::new(identifier, move |_| Some(ViewController::shared(name.clone())))
    }

    /// Attach a decline hook consulted before resolution.
    pub fn with_should_resolve(mut self, hook: impl Fn(&Params) -> bool + 'static) -> Self {
        self.should_resolve = Some(Box::new(hook));
        self
    }
}

impl ScreenFactory for FnScreenFactory {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn instantiate(&self, params: &Params) -> Option<ControllerRef> {
        (self.build)(params)
    }

    fn should_resolve(&self, params: &Params) -> bool {
        match &self.should_resolve {
            Some(hook) => hook(params),
            None => true,
        }
    }
}

impl std::fmt::Debug for FnScreenFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnScreenFactory")
            .field("identifier", &self.identifier)
            .field("has_should_resolve", &self.should_resolve.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_factory_builds_named_screen() {
        let factory = FnScreenFactory::plain("login");
        assert_eq!(factory.identifier(), "login");
        let vc = factory.instantiate(&Params::new()).unwrap();
        assert_eq!(vc.borrow().name(), "login");
        assert!(factory.should_resolve(&Params::new()));
    }

    #[test]
    fn test_should_resolve_hook() {
        let factory = FnScreenFactory::plain("settings")
            .with_should_resolve(|params| params.contains_key("token"));
        assert!(!factory.should_resolve(&Params::new()));
        let mut params = Params::new();
        params.insert("token".to_string(), "abc".to_string());
        assert!(factory.should_resolve(&params));
    }

    #[test]
    fn test_default_resolve_params_delivers_payload() {
        let factory = FnScreenFactory::plain("profile");
        let existing = ViewController::shared("profile");
        let mut params = Params::new();
        params.insert("name".to_string(), "alice".to_string());
        factory.resolve_params(&existing, &params);
        assert_eq!(existing.borrow().received_params().len(), 1);
        assert_eq!(
            existing.borrow().received_params()[0]
                .get("name")
                .map(String::as_str),
            Some("alice")
        );
    }
}
