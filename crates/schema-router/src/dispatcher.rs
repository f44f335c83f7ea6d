//! Executing resolved actions against the live view hierarchy.
//!
//! The dispatcher holds nothing alive: the host's view controllers arrive
//! as weak handles inside a [`NavigationContext`], and every path degrades
//! to an error reason (never a panic) when a handle is gone. Delayed
//! dispatch and completion hooks go through the shared [`RunLoop`], so no
//! call here ever blocks the caller.

use crate::resolver::{ResolvedAction, UnhandledReason};
use schema_url::{ControlEvents, NavigationKind, Params, SchemaDescriptor};
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, warn};
use ui_shell::{
    ControllerRef, ControllerWeak, NavigationWeak, RunLoop, TabBarWeak,
};

/// Why a dispatch produced no side effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Push requested but no navigation controller is wired up (or it has
    /// been deallocated).
    #[error("No navigation controller in context")]
    NoNavigationController,

    /// Present or control dispatch requested but no current view
    /// controller is wired up.
    #[error("No view controller in context")]
    NoViewController,

    /// Tab selection requested but no tab bar controller is wired up.
    #[error("No tab bar controller in context")]
    NoTabBarController,

    /// The tab bar controller has no tabs to select.
    #[error("Tab bar controller has no tabs")]
    NoTabs,

    /// No control with the identifier exists in the current screen.
    #[error("No control named {0:?} in the current screen")]
    ControlNotFound(String),

    /// The addressed control is disabled.
    #[error("Control {0:?} is disabled")]
    ControlDisabled(String),

    /// The factory refused to build a screen for these params.
    #[error("Factory for {0:?} returned no view controller")]
    InstantiationFailed(String),

    /// The factory declined and `force=1` was not set.
    #[error("Schema {0:?} declined resolution")]
    Declined(String),

    /// No factory is registered for the identifier.
    #[error("No schema registered for identifier {0:?}")]
    UnknownIdentifier(String),

    /// The module segment is not one the router knows.
    #[error("Unknown schema module {0:?}")]
    UnknownModule(String),

    /// The URL's scheme is foreign and no external opener accepted it.
    #[error("Foreign scheme {0:?} not opened")]
    ForeignScheme(String),
}

impl From<UnhandledReason> for DispatchError {
    fn from(reason: UnhandledReason) -> Self {
        match reason {
            UnhandledReason::UnknownModule(m) => Self::UnknownModule(m),
            UnhandledReason::UnknownIdentifier(id) => Self::UnknownIdentifier(id),
            UnhandledReason::Declined(id) => Self::Declined(id),
        }
    }
}

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new screen was pushed or presented.
    Shown,
    /// The destination was already on screen; params were delivered to it.
    DeliveredToExisting,
    /// A tab was selected (after clamping).
    TabSelected(usize),
    /// Control events were synthesized.
    ControlFired,
    /// The dispatch was scheduled for later; the outcome is decided when
    /// the run loop fires it.
    Deferred,
    /// A foreign-scheme URL was handed to the external opener.
    OpenedExternally,
}

/// Weak handles to the host's current navigation surfaces.
///
/// The host updates these whenever the active screen, navigation stack or
/// tab bar changes; the router only reads them and tolerates every handle
/// being absent or dead.
#[derive(Debug, Clone, Default)]
pub struct NavigationContext {
    view_controller: Option<ControllerWeak>,
    navigation_controller: Option<NavigationWeak>,
    tab_bar_controller: Option<TabBarWeak>,
}

impl NavigationContext {
    /// An empty context; every dispatch against it fails softly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the context at the currently visible view controller.
    pub fn set_view_controller(&mut self, controller: &ControllerRef) {
        self.view_controller = Some(Rc::downgrade(controller));
    }

    /// Point the context at the active navigation controller.
    pub fn set_navigation_controller(&mut self, controller: &ui_shell::NavigationRef) {
        self.navigation_controller = Some(Rc::downgrade(controller));
    }

    /// Point the context at the tab bar controller.
    pub fn set_tab_bar_controller(&mut self, controller: &ui_shell::TabBarRef) {
        self.tab_bar_controller = Some(Rc::downgrade(controller));
    }

    /// The live current view controller, if still around.
    pub fn view_controller(&self) -> Option<ControllerRef> {
        self.view_controller.as_ref().and_then(|w| w.upgrade())
    }

    /// The live navigation controller, if still around.
    pub fn navigation_controller(&self) -> Option<ui_shell::NavigationRef> {
        self.navigation_controller.as_ref().and_then(|w| w.upgrade())
    }

    /// The live tab bar controller, if still around.
    pub fn tab_bar_controller(&self) -> Option<ui_shell::TabBarRef> {
        self.tab_bar_controller.as_ref().and_then(|w| w.upgrade())
    }
}

/// Secondary URLs to open once the primary navigation lands.
///
/// Created per `open_url` call and consumed at most once: the completion
/// URL on the next run-loop turn after the transition, the view-did-appear
/// URL on the shown screen's next appear lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCompletion {
    /// Opened after the primary navigation completes.
    pub completion: Option<String>,
    /// Attached to the newly shown screen and opened when it appears.
    pub view_did_appear: Option<String>,
}

impl PendingCompletion {
    /// A pending pair with nothing to do.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether both hooks are absent.
    pub fn is_empty(&self) -> bool {
        self.completion.is_none() && self.view_did_appear.is_none()
    }
}

/// Executes resolved actions. Cheap to clone; clones share the run loop
/// and the re-entrant opener.
#[derive(Clone)]
pub struct Dispatcher {
    run_loop: RunLoop,
    opener: Rc<dyn Fn(&str) -> bool>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("run_loop", &self.run_loop)
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher over the given run loop. `opener` re-enters the
    /// facade's `open_url` for completion and appear chains.
    pub fn new(run_loop: RunLoop, opener: Rc<dyn Fn(&str) -> bool>) -> Self {
        Self { run_loop, opener }
    }

    /// Execute a resolved action.
    ///
    /// A positive `delay` on the descriptor schedules the whole dispatch on
    /// the run loop and reports [`DispatchOutcome::Deferred`] immediately;
    /// liveness of the context is re-checked when it fires, and a dead
    /// target makes the deferred dispatch a logged no-op. Unhandled
    /// resolutions fail immediately, delayed or not.
    pub fn dispatch(
        &self,
        action: ResolvedAction,
        descriptor: &SchemaDescriptor,
        context: NavigationContext,
        pending: PendingCompletion,
    ) -> Result<DispatchOutcome, DispatchError> {
        if let ResolvedAction::Unhandled(reason) = &action {
            return Err(reason.clone().into());
        }

        if descriptor.delay > 0.0 {
            let this = self.clone();
            let mut deferred = descriptor.clone();
            deferred.delay = 0.0;
            debug!(delay = descriptor.delay, url = %descriptor.original_url, "deferring dispatch");
            self.run_loop.schedule(descriptor.delay, move || {
                if let Err(error) = this.dispatch_now(action, &deferred, context, pending) {
                    warn!(%error, url = %deferred.original_url, "deferred dispatch failed");
                }
            });
            return Ok(DispatchOutcome::Deferred);
        }

        self.dispatch_now(action, descriptor, context, pending)
    }

    fn dispatch_now(
        &self,
        action: ResolvedAction,
        descriptor: &SchemaDescriptor,
        context: NavigationContext,
        pending: PendingCompletion,
    ) -> Result<DispatchOutcome, DispatchError> {
        match action {
            ResolvedAction::ShowViewController { factory, params } => match descriptor.navigation {
                NavigationKind::Push => self.push(&*factory, &params, descriptor, &context, pending),
                NavigationKind::Present => {
                    self.present(&*factory, &params, descriptor, &context, pending)
                }
                NavigationKind::SelectedIndex => {
                    self.select_tab(descriptor.selected_index, &context, pending)
                }
            },
            ResolvedAction::SelectTab { index } => self.select_tab(index, &context, pending),
            ResolvedAction::PerformControlEvent {
                identifier, events, ..
            } => self.fire_control(&identifier, events, &context, pending),
            ResolvedAction::Unhandled(reason) => Err(reason.into()),
        }
    }

    fn push(
        &self,
        factory: &dyn crate::factory::ScreenFactory,
        params: &Params,
        descriptor: &SchemaDescriptor,
        context: &NavigationContext,
        pending: PendingCompletion,
    ) -> Result<DispatchOutcome, DispatchError> {
        let nav = context
            .navigation_controller()
            .ok_or(DispatchError::NoNavigationController)?;

        if !descriptor.force {
            let top = nav.borrow().top().cloned();
            if let Some(existing) = top {
                if existing.borrow().name().eq_ignore_ascii_case(factory.identifier()) {
                    debug!(identifier = factory.identifier(), "destination already on top, delivering params");
                    factory.resolve_params(&existing, params);
                    self.finish(pending, Some(&existing));
                    return Ok(DispatchOutcome::DeliveredToExisting);
                }
            }
        }

        let controller = factory
            .instantiate(params)
            .ok_or_else(|| DispatchError::InstantiationFailed(factory.identifier().to_string()))?;
        self.attach_appear_hook(&pending, &controller);
        nav.borrow_mut().push(controller, descriptor.animated);
        self.schedule_completion(pending);
        Ok(DispatchOutcome::Shown)
    }

    fn present(
        &self,
        factory: &dyn crate::factory::ScreenFactory,
        params: &Params,
        descriptor: &SchemaDescriptor,
        context: &NavigationContext,
        pending: PendingCompletion,
    ) -> Result<DispatchOutcome, DispatchError> {
        let presenter = context
            .view_controller()
            .ok_or(DispatchError::NoViewController)?;

        if !descriptor.force {
            let already_current = presenter
                .borrow()
                .name()
                .eq_ignore_ascii_case(factory.identifier());
            if already_current {
                debug!(identifier = factory.identifier(), "destination already current, delivering params");
                factory.resolve_params(&presenter, params);
                self.finish(pending, Some(&presenter));
                return Ok(DispatchOutcome::DeliveredToExisting);
            }
        }

        let controller = factory
            .instantiate(params)
            .ok_or_else(|| DispatchError::InstantiationFailed(factory.identifier().to_string()))?;
        self.attach_appear_hook(&pending, &controller);
        presenter
            .borrow_mut()
            .present(controller, descriptor.animated);
        self.schedule_completion(pending);
        Ok(DispatchOutcome::Shown)
    }

    /// Tab selection clamps to the valid range and ignores `animated`.
    fn select_tab(
        &self,
        index: usize,
        context: &NavigationContext,
        pending: PendingCompletion,
    ) -> Result<DispatchOutcome, DispatchError> {
        let tab_bar = context
            .tab_bar_controller()
            .ok_or(DispatchError::NoTabBarController)?;
        let selected = {
            let mut tab_bar = tab_bar.borrow_mut();
            if !tab_bar.select(index) {
                return Err(DispatchError::NoTabs);
            }
            tab_bar.selected_index()
        };
        let target = tab_bar.borrow().selected().cloned();
        self.finish(pending, target.as_ref());
        Ok(DispatchOutcome::TabSelected(selected))
    }

    fn fire_control(
        &self,
        identifier: &str,
        events: ControlEvents,
        context: &NavigationContext,
        pending: PendingCompletion,
    ) -> Result<DispatchOutcome, DispatchError> {
        let current = context
            .view_controller()
            .ok_or(DispatchError::NoViewController)?;

        // Presented screens sit above their presenter in the responder
        // order, so the presented child is searched first.
        let target = {
            let presented = current.borrow().presented().cloned();
            match presented {
                Some(child) if child.borrow().control(identifier).is_some() => child,
                _ => current,
            }
        };

        let mut screen = target.borrow_mut();
        let control = screen
            .control_mut(identifier)
            .ok_or_else(|| DispatchError::ControlNotFound(identifier.to_string()))?;
        if !control.send_actions(events) {
            return Err(DispatchError::ControlDisabled(identifier.to_string()));
        }
        debug!(identifier, ?events, "synthesized control events");
        drop(screen);
        self.schedule_completion(pending);
        Ok(DispatchOutcome::ControlFired)
    }

    /// Attach the appear hook to the screen about to be shown.
    fn attach_appear_hook(&self, pending: &PendingCompletion, controller: &ControllerRef) {
        if let Some(url) = &pending.view_did_appear {
            controller.borrow_mut().set_view_did_appear_schema(url.clone());
        }
    }

    /// Run the completion URL on the next run-loop turn, after the
    /// transition that triggered it has fully unwound.
    fn schedule_completion(&self, pending: PendingCompletion) {
        if let Some(url) = pending.completion {
            let opener = self.opener.clone();
            self.run_loop.schedule(0.0, move || {
                opener(&url);
            });
        }
    }

    /// Consume both hooks against an already-visible target.
    fn finish(&self, pending: PendingCompletion, target: Option<&ControllerRef>) {
        if let Some(url) = &pending.view_did_appear {
            match target {
                Some(controller) => controller
                    .borrow_mut()
                    .set_view_did_appear_schema(url.clone()),
                None => warn!(url = %url, "no target to carry the view-did-appear schema"),
            }
        }
        self.schedule_completion(PendingCompletion {
            completion: pending.completion,
            view_did_appear: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::FnScreenFactory;
    use crate::registry::SchemaRegistry;
    use crate::resolver::resolve;
    use std::cell::RefCell;
    use ui_shell::{Control, NavigationController, TabBarController, ViewController};

    fn dispatcher(run_loop: &RunLoop) -> Dispatcher {
        Dispatcher::new(run_loop.clone(), Rc::new(|_: &str| false))
    }

    fn login_registry() -> SchemaRegistry {
        let registry = SchemaRegistry::new();
        registry.register_factory(Rc::new(FnScreenFactory::plain("login")));
        registry
    }

    #[test]
    fn test_push_requires_navigation_controller() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login");
        let action = resolve(&descriptor, &registry);
        let result = dispatcher(&run_loop).dispatch(
            action,
            &descriptor,
            NavigationContext::new(),
            PendingCompletion::none(),
        );
        assert_eq!(result, Err(DispatchError::NoNavigationController));
    }

    #[test]
    fn test_push_lands_on_stack() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let nav = Rc::new(RefCell::new(NavigationController::with_root(
            ViewController::shared("home"),
        )));
        let mut context = NavigationContext::new();
        context.set_navigation_controller(&nav);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login?animated=0");
        let action = resolve(&descriptor, &registry);
        let outcome = dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Shown);
        assert_eq!(nav.borrow().depth(), 2);
        assert_eq!(nav.borrow().top().unwrap().borrow().name(), "login");
        assert!(!nav.borrow().transitions()[0].animated);
    }

    #[test]
    fn test_present_shows_modally() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let home = ViewController::shared("home");
        let mut context = NavigationContext::new();
        context.set_view_controller(&home);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login?navigation=1&animated=0");
        let action = resolve(&descriptor, &registry);
        let outcome = dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Shown);
        assert_eq!(home.borrow().presented().unwrap().borrow().name(), "login");
    }

    #[test]
    fn test_present_without_context_fails() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login?navigation=1");
        let action = resolve(&descriptor, &registry);
        let result = dispatcher(&run_loop).dispatch(
            action,
            &descriptor,
            NavigationContext::new(),
            PendingCompletion::none(),
        );
        assert_eq!(result, Err(DispatchError::NoViewController));
    }

    #[test]
    fn test_existing_top_receives_params_instead_of_duplicate() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let login = ViewController::shared("login");
        let nav = Rc::new(RefCell::new(NavigationController::with_root(login.clone())));
        let mut context = NavigationContext::new();
        context.set_navigation_controller(&nav);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login?name=alice");
        let action = resolve(&descriptor, &registry);
        let outcome = dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::DeliveredToExisting);
        assert_eq!(nav.borrow().depth(), 1);
        assert_eq!(login.borrow().received_params().len(), 1);
    }

    #[test]
    fn test_force_pushes_duplicate_over_existing() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let nav = Rc::new(RefCell::new(NavigationController::with_root(
            ViewController::shared("login"),
        )));
        let mut context = NavigationContext::new();
        context.set_navigation_controller(&nav);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login?force=1");
        let action = resolve(&descriptor, &registry);
        let outcome = dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Shown);
        assert_eq!(nav.borrow().depth(), 2);
    }

    #[test]
    fn test_tab_selection_clamps_and_ignores_animated() {
        let run_loop = RunLoop::new();
        let registry = SchemaRegistry::new();
        let tabs = Rc::new(RefCell::new(TabBarController::new(vec![
            ViewController::shared("home"),
            ViewController::shared("search"),
        ])));
        let mut context = NavigationContext::new();
        context.set_tab_bar_controller(&tabs);

        let descriptor = SchemaDescriptor::parse("app://tabbar/selectedindex/9");
        let action = resolve(&descriptor, &registry);
        let outcome = dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::TabSelected(1));
        assert_eq!(tabs.borrow().selected_index(), 1);
    }

    #[test]
    fn test_tab_selection_without_context_fails() {
        let run_loop = RunLoop::new();
        let registry = SchemaRegistry::new();
        let descriptor = SchemaDescriptor::parse("app://tabbar?selectedindex=1");
        let action = resolve(&descriptor, &registry);
        let result = dispatcher(&run_loop).dispatch(
            action,
            &descriptor,
            NavigationContext::new(),
            PendingCompletion::none(),
        );
        assert_eq!(result, Err(DispatchError::NoTabBarController));
    }

    #[test]
    fn test_control_fires_on_current_screen() {
        let run_loop = RunLoop::new();
        let registry = SchemaRegistry::new();
        let home = ViewController::shared("home");
        home.borrow_mut().add_control(Control::new("like"));
        let mut context = NavigationContext::new();
        context.set_view_controller(&home);

        let descriptor = SchemaDescriptor::parse("app://control/like/action/64");
        let action = resolve(&descriptor, &registry);
        let outcome = dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::ControlFired);
        assert_eq!(
            home.borrow().control("like").unwrap().fired(),
            &[ControlEvents::TOUCH_UP_INSIDE]
        );
    }

    #[test]
    fn test_control_on_presented_screen_wins() {
        let run_loop = RunLoop::new();
        let registry = SchemaRegistry::new();
        let home = ViewController::shared("home");
        home.borrow_mut().add_control(Control::new("like"));
        let sheet = ViewController::shared("share-sheet");
        sheet.borrow_mut().add_control(Control::new("like"));
        home.borrow_mut().present(sheet.clone(), false);
        let mut context = NavigationContext::new();
        context.set_view_controller(&home);

        let descriptor = SchemaDescriptor::parse("app://control/like/action/64");
        let action = resolve(&descriptor, &registry);
        dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(sheet.borrow().control("like").unwrap().fired().len(), 1);
        assert!(home.borrow().control("like").unwrap().fired().is_empty());
    }

    #[test]
    fn test_missing_control_fails_silently() {
        let run_loop = RunLoop::new();
        let registry = SchemaRegistry::new();
        let home = ViewController::shared("home");
        let mut context = NavigationContext::new();
        context.set_view_controller(&home);

        let descriptor = SchemaDescriptor::parse("app://control/like/action/64");
        let action = resolve(&descriptor, &registry);
        let result = dispatcher(&run_loop).dispatch(
            action,
            &descriptor,
            context,
            PendingCompletion::none(),
        );
        assert_eq!(result, Err(DispatchError::ControlNotFound("like".to_string())));
    }

    #[test]
    fn test_delay_defers_dispatch() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let nav = Rc::new(RefCell::new(NavigationController::with_root(
            ViewController::shared("home"),
        )));
        let mut context = NavigationContext::new();
        context.set_navigation_controller(&nav);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login?delay=2");
        let action = resolve(&descriptor, &registry);
        let outcome = dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Deferred);
        assert_eq!(nav.borrow().depth(), 1);

        run_loop.advance(1.0);
        assert_eq!(nav.borrow().depth(), 1);
        run_loop.advance(1.0);
        assert_eq!(nav.borrow().depth(), 2);
    }

    #[test]
    fn test_delayed_dispatch_against_dropped_target_is_noop() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let nav = Rc::new(RefCell::new(NavigationController::with_root(
            ViewController::shared("home"),
        )));
        let mut context = NavigationContext::new();
        context.set_navigation_controller(&nav);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login?delay=1");
        let action = resolve(&descriptor, &registry);
        dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, PendingCompletion::none())
            .unwrap();

        drop(nav);
        // Fires against a dead weak handle; must not panic.
        run_loop.advance(1.0);
        assert_eq!(run_loop.pending(), 0);
    }

    #[test]
    fn test_completion_runs_on_next_turn() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let opened: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = opened.clone();
        let dispatcher = Dispatcher::new(
            run_loop.clone(),
            Rc::new(move |url: &str| {
                sink.borrow_mut().push(url.to_string());
                true
            }),
        );
        let nav = Rc::new(RefCell::new(NavigationController::with_root(
            ViewController::shared("home"),
        )));
        let mut context = NavigationContext::new();
        context.set_navigation_controller(&nav);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login");
        let action = resolve(&descriptor, &registry);
        let pending = PendingCompletion {
            completion: Some("app://tabbar?selectedindex=1".to_string()),
            view_did_appear: None,
        };
        dispatcher
            .dispatch(action, &descriptor, context, pending)
            .unwrap();
        assert!(opened.borrow().is_empty());
        run_loop.drain();
        assert_eq!(opened.borrow().as_slice(), ["app://tabbar?selectedindex=1"]);
    }

    #[test]
    fn test_appear_hook_rides_on_new_screen() {
        let run_loop = RunLoop::new();
        let registry = login_registry();
        let nav = Rc::new(RefCell::new(NavigationController::with_root(
            ViewController::shared("home"),
        )));
        let mut context = NavigationContext::new();
        context.set_navigation_controller(&nav);

        let descriptor = SchemaDescriptor::parse("app://viewcontroller/login");
        let action = resolve(&descriptor, &registry);
        let pending = PendingCompletion {
            completion: None,
            view_did_appear: Some("app://control/like/action/64".to_string()),
        };
        dispatcher(&run_loop)
            .dispatch(action, &descriptor, context, pending)
            .unwrap();
        let shown = nav.borrow().top().unwrap().clone();
        assert_eq!(
            shown.borrow().view_did_appear_schema(),
            Some("app://control/like/action/64")
        );
    }
}
