use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Joystick type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoystickType {
    Left,
    Right,
}

// Trigger type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerType {
    Left,
    Right,
}

// Button type (Xbox layout)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonType {
    A,
    B,
    X,
    Y,
    Start,
    Select,
    LeftBumper,
    RightBumper,
    LeftStick,
    RightStick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Guide,
}

/// Raw deflection of one analog stick, in the signed 16-bit range of the pad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StickPosition {
    pub x: i16,
    pub y: i16,
}

impl StickPosition {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Complete controller state captured by a single poll.
///
/// Snapshots are immutable values; the polling loop acquires exactly one per
/// slot and tick and derives every fact it needs from it.
#[derive(Clone, Debug)]
pub struct ControllerSnapshot {
    pub buttons: HashSet<ButtonType>,
    /// Trigger magnitudes, 0 (released) to 255 (fully pulled)
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_stick: StickPosition,
    pub right_stick: StickPosition,
    pub timestamp: DateTime<Local>,
}

impl Default for ControllerSnapshot {
    fn default() -> Self {
        Self {
            buttons: HashSet::new(),
            left_trigger: 0,
            right_trigger: 0,
            left_stick: StickPosition::default(),
            right_stick: StickPosition::default(),
            timestamp: Local::now(),
        }
    }
}

impl ControllerSnapshot {
    pub fn is_pressed(&self, button: ButtonType) -> bool {
        self.buttons.contains(&button)
    }

    pub fn trigger(&self, trigger: TriggerType) -> u8 {
        match trigger {
            TriggerType::Left => self.left_trigger,
            TriggerType::Right => self.right_trigger,
        }
    }

    pub fn stick(&self, stick: JoystickType) -> StickPosition {
        match stick {
            JoystickType::Left => self.left_stick,
            JoystickType::Right => self.right_stick,
        }
    }

    // Builder-style helpers, mostly for scripted sources
    pub fn with_button(mut self, button: ButtonType) -> Self {
        self.buttons.insert(button);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerType, value: u8) -> Self {
        match trigger {
            TriggerType::Left => self.left_trigger = value,
            TriggerType::Right => self.right_trigger = value,
        }
        self
    }

    pub fn with_stick(mut self, stick: JoystickType, x: i16, y: i16) -> Self {
        match stick {
            JoystickType::Left => self.left_stick = StickPosition::new(x, y),
            JoystickType::Right => self.right_stick = StickPosition::new(x, y),
        }
        self
    }
}
