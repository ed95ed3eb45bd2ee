//! Output actions and the bindings that produce them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named keys that can be held down
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    #[serde(alias = "return")]
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Home,
    #[serde(alias = "ctrl")]
    Control,
    #[serde(rename = "right option", alias = "altgr")]
    AltGr,
}

impl Key {
    pub fn name(self) -> &'static str {
        match self {
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::Space => "space",
            Key::Enter => "enter",
            Key::Tab => "tab",
            Key::Backspace => "backspace",
            Key::Delete => "delete",
            Key::Escape => "escape",
            Key::Home => "home",
            Key::Control => "control",
            Key::AltGr => "right option",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content of one action table cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// Momentary text write, nothing to release
    Write(String),
    /// Key pressed on `Pressed` and released on `Released`
    Hold(Key),
    /// Explicit no-op, stops the neutral fallback
    Nothing,
}

impl Binding {
    pub fn write(text: impl Into<String>) -> Self {
        Binding::Write(text.into())
    }
}

/// Exactly one of these is produced per transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Press(Key),
    Release(Key),
    Write(String),
    NoOp,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Press(key) => write!(f, "press {}", key),
            Action::Release(key) => write!(f, "release {}", key),
            Action::Write(text) => write!(f, "write {:?}", text),
            Action::NoOp => write!(f, "no-op"),
        }
    }
}
