//! Schema URL parsing for Schema Kit
//!
//! This crate turns the app's custom deep-link URLs into typed descriptors.
//! Two equivalent surface syntaxes are accepted:
//!
//! - query form: `app://viewcontroller/login?navigation=1&animated=0`
//! - path-segment form: `app://viewcontroller/login/navigation/1/animated/0`
//!
//! Parsing is permissive by design: malformed input never produces an error,
//! only a descriptor with documented defaults. The router layer decides what
//! a descriptor means; this crate only normalizes the surface syntax.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod parser;

pub use descriptor::{ControlEvents, NavigationKind, Params, SchemaDescriptor, SchemaModule};
