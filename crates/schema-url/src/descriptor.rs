//! Typed descriptor for a parsed schema URL.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Remaining application-specific key/value payload of a schema URL.
///
/// Only keys the parser does not recognize end up here; recognized keys
/// (`navigation`, `animated`, `selectedindex`, `action`, `class`, `force`,
/// `delay`) are lifted into typed descriptor fields instead.
pub type Params = BTreeMap<String, String>;

/// Param key: `navigation`
pub const NAVIGATION_KEY: &str = "navigation";
/// Param key: `animated`
pub const ANIMATED_KEY: &str = "animated";
/// Param key: `selectedindex`
pub const SELECTED_INDEX_KEY: &str = "selectedindex";
/// Param key: `action`
pub const ACTION_KEY: &str = "action";
/// Param key: `class`
pub const SCHEMA_CLASS_KEY: &str = "class";
/// Param key: `force`
pub const FORCE_KEY: &str = "force";
/// Param key: `delay`
pub const DELAY_KEY: &str = "delay";

/// Reserved identifier selecting the tab bar under the `viewcontroller`
/// module (`app://viewcontroller/tabbar?selectedindex=1`).
pub const TAB_BAR_IDENTIFIER: &str = "tabbar";

/// Top-level URL segment selecting the kind of target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaModule {
    /// A screen shown by push/present (`viewcontroller`).
    ViewController,
    /// A control embedded in the current screen (`control`).
    Control,
    /// The tab bar shortcut module (`tabbar`).
    TabBar,
    /// Anything else; resolves to nothing downstream.
    Unknown(String),
}

impl SchemaModule {
    /// Parse a module from its URL segment, case-insensitively.
    pub fn from_segment(segment: &str) -> Self {
        match segment.to_ascii_lowercase().as_str() {
            "viewcontroller" => Self::ViewController,
            "control" => Self::Control,
            "tabbar" => Self::TabBar,
            _ => Self::Unknown(segment.to_string()),
        }
    }

    /// The canonical URL segment for this module.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ViewController => "viewcontroller",
            Self::Control => "control",
            Self::TabBar => "tabbar",
            Self::Unknown(other) => other,
        }
    }
}

/// How a resolved screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    /// Push onto the navigation controller's stack.
    #[default]
    Push,
    /// Present modally from the current screen.
    Present,
    /// Select a tab on the tab bar controller.
    SelectedIndex,
}

impl NavigationKind {
    /// Parse from the numeric wire value (`0` push, `1` present,
    /// `2` selected index); anything else falls back to push.
    pub fn from_wire(value: i64) -> Self {
        match value {
            1 => Self::Present,
            2 => Self::SelectedIndex,
            _ => Self::Push,
        }
    }
}

bitflags! {
    /// Mask of control-event kinds a `control` schema can synthesize.
    ///
    /// Bit positions follow the conventional touch/editing event layout so
    /// wire values like `action=64` (touch-up-inside) keep their meaning.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlEvents: u32 {
        /// Finger down inside the control.
        const TOUCH_DOWN = 1 << 0;
        /// Repeated touch down (tap count above one).
        const TOUCH_DOWN_REPEAT = 1 << 1;
        /// Drag while inside the control's bounds.
        const TOUCH_DRAG_INSIDE = 1 << 2;
        /// Drag while outside the control's bounds.
        const TOUCH_DRAG_OUTSIDE = 1 << 3;
        /// Drag entering the control's bounds.
        const TOUCH_DRAG_ENTER = 1 << 4;
        /// Drag leaving the control's bounds.
        const TOUCH_DRAG_EXIT = 1 << 5;
        /// Finger up inside the control; the default action event.
        const TOUCH_UP_INSIDE = 1 << 6;
        /// Finger up outside the control.
        const TOUCH_UP_OUTSIDE = 1 << 7;
        /// System event cancelling the touch.
        const TOUCH_CANCEL = 1 << 8;
        /// The control's value changed.
        const VALUE_CHANGED = 1 << 12;
        /// The control's primary action was triggered.
        const PRIMARY_ACTION_TRIGGERED = 1 << 13;
        /// Editing began in a text control.
        const EDITING_DID_BEGIN = 1 << 16;
        /// Text changed in a text control.
        const EDITING_CHANGED = 1 << 17;
        /// Editing ended in a text control.
        const EDITING_DID_END = 1 << 18;
        /// Editing ended by dismissing the keyboard.
        const EDITING_DID_END_ON_EXIT = 1 << 19;
    }
}

impl Default for ControlEvents {
    fn default() -> Self {
        Self::TOUCH_UP_INSIDE
    }
}

// Serialized as the raw wire mask so descriptors round-trip through JSON
// the same way they round-trip through a URL.
impl Serialize for ControlEvents {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for ControlEvents {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_wire(bits))
    }
}

impl ControlEvents {
    /// Parse from the numeric wire value, dropping unknown bits. Zero or
    /// unrecognized input falls back to [`Self::TOUCH_UP_INSIDE`].
    pub fn from_wire(value: u32) -> Self {
        let events = Self::from_bits_truncate(value);
        if events.is_empty() {
            Self::default()
        } else {
            events
        }
    }
}

/// Immutable value parsed from a schema URL.
///
/// Equivalent query-form and path-segment-form URLs produce equal
/// descriptors. `module` plus `identifier` select the handler consulted by
/// the router; everything the parser does not recognize rides along in
/// [`Self::params`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// URL scheme, e.g. `app` in `app://viewcontroller/login`.
    pub scheme: String,
    /// The module namespace the identifier lives under.
    pub module: SchemaModule,
    /// Handler identifier, e.g. `login` or `like`. May be empty for the
    /// `tabbar` module shortcut.
    pub identifier: String,
    /// Explicit handler override from the `class` param; consulted before
    /// the module's default identifier when resolving.
    pub schema_class_identifier: Option<String>,
    /// How a `viewcontroller` target is shown.
    pub navigation: NavigationKind,
    /// Events synthesized on a `control` target.
    pub control_events: ControlEvents,
    /// Animate the transition. Defaults to true.
    pub animated: bool,
    /// Target tab index for the tab bar. Defaults to 0.
    pub selected_index: usize,
    /// Override a declining handler. Defaults to false.
    pub force: bool,
    /// Seconds to defer dispatch. Defaults to 0.
    pub delay: f64,
    /// Unrecognized key/value payload, percent-decoded.
    pub params: Params,
    /// The URL this descriptor was parsed from, verbatim.
    pub original_url: String,
}

impl SchemaDescriptor {
    /// Reconstruct a canonical query-form URL for this descriptor.
    ///
    /// Only non-default fields are emitted; `params` are appended in key
    /// order. The result parses back to an equal descriptor.
    pub fn to_url(&self) -> String {
        let mut url = format!("{}://{}", self.scheme, self.module.as_str());
        if !self.identifier.is_empty() {
            url.push('/');
            url.push_str(&urlencoding::encode(&self.identifier));
        }

        let mut query: Vec<String> = Vec::new();
        if self.navigation != NavigationKind::default() {
            query.push(format!("{}={}", NAVIGATION_KEY, self.navigation as u8));
        }
        if !self.animated {
            query.push(format!("{}=0", ANIMATED_KEY));
        }
        if self.selected_index != 0 {
            query.push(format!("{}={}", SELECTED_INDEX_KEY, self.selected_index));
        }
        if self.control_events != ControlEvents::default() {
            query.push(format!("{}={}", ACTION_KEY, self.control_events.bits()));
        }
        if let Some(class) = &self.schema_class_identifier {
            query.push(format!("{}={}", SCHEMA_CLASS_KEY, urlencoding::encode(class)));
        }
        if self.force {
            query.push(format!("{}=1", FORCE_KEY));
        }
        if self.delay > 0.0 {
            query.push(format!("{}={}", DELAY_KEY, self.delay));
        }
        for (key, value) in &self.params {
            query.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ));
        }

        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// Whether this descriptor addresses the tab bar, either through the
    /// `tabbar` module shortcut or the reserved identifier under
    /// `viewcontroller`.
    pub fn is_tab_bar(&self) -> bool {
        self.module == SchemaModule::TabBar
            || (self.module == SchemaModule::ViewController
                && self.identifier.eq_ignore_ascii_case(TAB_BAR_IDENTIFIER))
    }
}
