//! Built-in `alert` schema handler.
//!
//! `app://viewcontroller/alert?navigation=1&title=Oops&message=Try%20again&button=Retry,Cancel`
//! builds an alert screen from its params; each button becomes a control so
//! the host (or a follow-up `control` schema) can tap it.

use crate::factory::ScreenFactory;
use schema_url::Params;
use std::rc::Rc;
use ui_shell::{Control, ControllerRef, ViewController};

/// Identifier the alert factory registers under.
pub const ALERT_IDENTIFIER: &str = "alert";

const TITLE_KEY: &str = "title";
const MESSAGE_KEY: &str = "message";
const STYLE_KEY: &str = "style";
const BUTTON_KEY: &str = "button";

/// Presentation style of an alert, from the `style` param.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertStyle {
    /// Bottom action sheet (`style=0`).
    ActionSheet,
    /// Centered alert (`style=1`, the default).
    #[default]
    Alert,
}

/// Alert configuration extracted from schema params.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlertConfig {
    /// Alert title, from `title`.
    pub title: Option<String>,
    /// Alert body, from `message`.
    pub message: Option<String>,
    /// Presentation style, from `style`.
    pub style: AlertStyle,
    /// Button titles, from the comma-separated `button` param. Defaults to
    /// a single "OK".
    pub buttons: Vec<String>,
}

impl AlertConfig {
    /// Read an alert configuration out of schema params. Like everything
    /// else in the schema surface, this is permissive: missing or garbled
    /// values get defaults.
    pub fn from_params(params: &Params) -> Self {
        let style = match params.get(STYLE_KEY).map(String::as_str) {
            Some("0") => AlertStyle::ActionSheet,
            _ => AlertStyle::Alert,
        };
        let buttons: Vec<String> = params
            .get(BUTTON_KEY)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|b| !b.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .filter(|buttons: &Vec<String>| !buttons.is_empty())
            .unwrap_or_else(|| vec!["OK".to_string()]);
        Self {
            title: params.get(TITLE_KEY).cloned(),
            message: params.get(MESSAGE_KEY).cloned(),
            style,
            buttons,
        }
    }
}

/// Factory for the built-in alert screen, registered by every manager.
#[derive(Debug, Default)]
pub struct AlertFactory;

impl ScreenFactory for AlertFactory {
    fn identifier(&self) -> &str {
        ALERT_IDENTIFIER
    }

    fn instantiate(&self, params: &Params) -> Option<ControllerRef> {
        let config = AlertConfig::from_params(params);
        let mut alert = ViewController::new(ALERT_IDENTIFIER);
        for button in &config.buttons {
            alert.add_control(Control::new(button.clone()));
        }
        // The full param payload rides along so the host can read the
        // title/message when it renders the alert.
        alert.receive_params(params.clone());
        Some(Rc::new(std::cell::RefCell::new(alert)))
    }
}
