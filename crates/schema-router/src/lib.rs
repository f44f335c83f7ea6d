//! URL-scheme responder routing for Schema Kit
//!
//! This crate turns parsed schema descriptors into navigation side effects
//! on the host's view hierarchy:
//!
//! - [`registry`] maps schema identifiers to screen factories, with an
//!   instance registry shadowing an optional shared parent;
//! - [`resolver`] decides which factory (or control, or tab) a descriptor
//!   addresses, honoring the `class` override and the decline/force policy;
//! - [`dispatcher`] executes a resolved action against weak handles to the
//!   live view hierarchy, scheduling delays and completion hooks on the
//!   run loop;
//! - [`manager`] is the facade the host talks to: `open_url`,
//!   `can_open_url`, context wiring, and the appear-lifecycle notification.
//!
//! The error philosophy is permissive degradation: nothing in this crate
//! panics on bad input, and every failure is a reason code that the facade
//! collapses to a boolean, matching a deep-link surface where the only
//! user-visible failure is "nothing happened".

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alert;
pub mod dispatcher;
pub mod factory;
pub mod manager;
pub mod registry;
pub mod resolver;

pub use dispatcher::{DispatchError, DispatchOutcome, NavigationContext, PendingCompletion};
pub use factory::{FnScreenFactory, ScreenFactory};
pub use manager::{ExternalOpener, ResponderSchemaManager};
pub use registry::SchemaRegistry;
pub use resolver::{resolve, ResolvedAction, UnhandledReason};
