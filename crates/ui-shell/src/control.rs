//! Controls addressable by schema identifier.

use schema_url::ControlEvents;

/// An interactive control embedded in a screen.
///
/// The router locates controls by identifier (case-insensitive) and
/// synthesizes control events on them; the control records what was fired so
/// the host (and tests) can observe it.
#[derive(Debug, Clone)]
pub struct Control {
    identifier: String,
    enabled: bool,
    fired: Vec<ControlEvents>,
}

impl Control {
    /// Create an enabled control with the given identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            enabled: true,
            fired: Vec::new(),
        }
    }

    /// The schema identifier this control answers to.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether the control currently accepts synthesized events.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the control.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Synthesize the given events on this control.
    ///
    /// Returns false without recording anything when the control is
    /// disabled.
    pub fn send_actions(&mut self, events: ControlEvents) -> bool {
        if !self.enabled {
            return false;
        }
        self.fired.push(events);
        true
    }

    /// Every event mask fired on this control, in order.
    pub fn fired(&self) -> &[ControlEvents] {
        &self.fired
    }

    /// Union of everything ever fired on this control.
    pub fn fired_union(&self) -> ControlEvents {
        self.fired
            .iter()
            .copied()
            .fold(ControlEvents::empty(), |acc, e| acc | e)
    }
}
