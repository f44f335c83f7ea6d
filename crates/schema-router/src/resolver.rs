//! Descriptor resolution.
//!
//! Resolution is a pure function of the descriptor and the registry state:
//! calling it twice with the same inputs yields the same action. Nothing
//! here touches the live view hierarchy; that is the dispatcher's job.

use crate::factory::ScreenFactory;
use crate::registry::SchemaRegistry;
use schema_url::{ControlEvents, Params, SchemaDescriptor, SchemaModule};
use std::rc::Rc;
use tracing::debug;

/// Why a descriptor resolved to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnhandledReason {
    /// The module segment is not one the router knows.
    UnknownModule(String),
    /// No factory is registered for the identifier.
    UnknownIdentifier(String),
    /// The factory declined and the URL did not carry `force=1`.
    Declined(String),
}

/// The action a descriptor resolves to.
#[derive(Clone)]
pub enum ResolvedAction {
    /// Show a screen built by `factory`, navigated per the descriptor.
    ShowViewController {
        /// Factory for the destination screen.
        factory: Rc<dyn ScreenFactory>,
        /// Application payload forwarded to the screen.
        params: Params,
    },
    /// Select a tab on the tab bar controller.
    SelectTab {
        /// Target index; the dispatcher clamps it to the valid range.
        index: usize,
    },
    /// Synthesize control events on a control of the current screen.
    PerformControlEvent {
        /// Control identifier, matched case-insensitively.
        identifier: String,
        /// Events to synthesize.
        events: ControlEvents,
        /// Application payload (recorded, not interpreted).
        params: Params,
    },
    /// Nothing handles this descriptor.
    Unhandled(UnhandledReason),
}

impl std::fmt::Debug for ResolvedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShowViewController { factory, params } => f
                .debug_struct("ShowViewController")
                .field("identifier", &factory.identifier())
                .field("params", params)
                .finish(),
            Self::SelectTab { index } => f.debug_struct("SelectTab").field("index", index).finish(),
            Self::PerformControlEvent {
                identifier,
                events,
                params,
            } => f
                .debug_struct("PerformControlEvent")
                .field("identifier", identifier)
                .field("events", events)
                .field("params", params)
                .finish(),
            Self::Unhandled(reason) => f.debug_tuple("Unhandled").field(reason).finish(),
        }
    }
}

/// Resolve a descriptor against the registry.
///
/// Order: the tab bar shortcut short-circuits; a `class` override is
/// consulted before the module's default identifier; finally the factory's
/// decline capability is asked, with `force=1` overriding a refusal.
pub fn resolve(descriptor: &SchemaDescriptor, registry: &SchemaRegistry) -> ResolvedAction {
    if descriptor.is_tab_bar() {
        return ResolvedAction::SelectTab {
            index: descriptor.selected_index,
        };
    }

    match &descriptor.module {
        SchemaModule::Control => {
            if descriptor.identifier.is_empty() {
                return ResolvedAction::Unhandled(UnhandledReason::UnknownIdentifier(
                    String::new(),
                ));
            }
            ResolvedAction::PerformControlEvent {
                identifier: descriptor.identifier.clone(),
                events: descriptor.control_events,
                params: descriptor.params.clone(),
            }
        }
        SchemaModule::ViewController => {
            // The explicit class override bypasses the module's default
            // identifier entirely.
            let key = descriptor
                .schema_class_identifier
                .as_deref()
                .unwrap_or(&descriptor.identifier);
            let Some(factory) = registry.lookup(key) else {
                debug!(identifier = key, "no factory registered for schema");
                return ResolvedAction::Unhandled(UnhandledReason::UnknownIdentifier(
                    key.to_string(),
                ));
            };
            if !factory.should_resolve(&descriptor.params) && !descriptor.force {
                debug!(identifier = key, "factory declined and force is not set");
                return ResolvedAction::Unhandled(UnhandledReason::Declined(key.to_string()));
            }
            ResolvedAction::ShowViewController {
                factory,
                params: descriptor.params.clone(),
            }
        }
        SchemaModule::TabBar => ResolvedAction::SelectTab {
            index: descriptor.selected_index,
        },
        SchemaModule::Unknown(module) => {
            debug!(module = %module, "unknown schema module");
            ResolvedAction::Unhandled(UnhandledReason::UnknownModule(module.clone()))
        }
    }
}
