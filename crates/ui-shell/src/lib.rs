//! View-hierarchy model for Schema Kit
//!
//! This crate is the explicit object graph the router dispatches against:
//! view controllers, a navigation controller, a tab bar controller, and the
//! controls embedded in a screen. Everything is single-threaded and wired
//! with `Rc`/`Weak`; the host owns the strong references and the router only
//! ever borrows.
//!
//! It also provides [`RunLoop`], the deferred-execution primitive used for
//! delayed dispatch and transition-completion callbacks. The host pumps it
//! from its main loop; nothing here spawns threads or blocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod control;
pub mod controller;
pub mod run_loop;

pub use control::Control;
pub use controller::{
    ControllerRef, ControllerWeak, NavigationController, NavigationRef, NavigationWeak,
    TabBarController, TabBarRef, TabBarWeak, Transition, ViewController,
};
pub use run_loop::RunLoop;
