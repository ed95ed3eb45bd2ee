//! Declarative action table
//!
//! Maps `(input, aim, modifier)` to a [`Binding`]. The table is built once at
//! startup and only read afterwards.

use super::action::{Binding, Key};
use super::error::MappingError;
use super::input::InputId;
use super::quadrant::{Aim, Quadrant, StickPolicy};
use crate::controller::JoystickType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Layer selected by holding the left stick click
pub const FN1: InputId = InputId::LeftStick;
/// Layer selected by holding the right stick click
pub const FN2: InputId = InputId::RightStick;

/// `(input, aim or neutral, active modifier or none)`
pub type TableKey = (InputId, Option<Aim>, Option<InputId>);

// Cells of one row: plain layer, FN1, FN2. An empty string is an explicit no-op.
macro_rules! write_row {
    ($table:expr, $input:expr, $aim:expr, $plain:expr, $fn1:expr, $fn2:expr) => {
        $table.insert_write_layers($input, $aim, [$plain, $fn1, $fn2]);
    };
}

macro_rules! hold_row {
    ($table:expr, $input:expr, $plain:expr, $fn1:expr, $fn2:expr) => {
        $table.insert_hold_layers($input, [$plain, $fn1, $fn2]);
    };
}

fn right(quadrant: Quadrant) -> Option<Aim> {
    Aim::new(JoystickType::Right, quadrant)
}

fn left(quadrant: Quadrant) -> Option<Aim> {
    Aim::new(JoystickType::Left, quadrant)
}

#[derive(Clone, Debug, Default)]
pub struct ActionTable {
    bindings: HashMap<TableKey, Binding>,
    stick_policies: HashMap<InputId, StickPolicy>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        input: InputId,
        aim: Option<Aim>,
        modifier: Option<InputId>,
        binding: Binding,
    ) -> Option<Binding> {
        self.bindings.insert((input, aim, modifier), binding)
    }

    pub fn set_stick_policy(&mut self, input: InputId, policy: StickPolicy) {
        self.stick_policies.insert(input, policy);
    }

    pub fn stick_policy(&self, input: InputId) -> StickPolicy {
        self.stick_policies.get(&input).copied().unwrap_or_default()
    }

    /// Exact lookup, no fallback
    pub fn get(
        &self,
        input: InputId,
        aim: Option<Aim>,
        modifier: Option<InputId>,
    ) -> Option<&Binding> {
        self.bindings.get(&(input, aim, modifier))
    }

    /// Lookup with the neutral fallback: `(input, aim, modifier)` first, then
    /// `(input, neutral, modifier)`.
    pub fn resolve(
        &self,
        input: InputId,
        aim: Option<Aim>,
        modifier: Option<InputId>,
    ) -> Option<&Binding> {
        self.get(input, aim, modifier).or_else(|| match aim {
            Some(_) => self.get(input, None, modifier),
            None => None,
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Inputs with a stick policy other than [`StickPolicy::Ignore`], in poll order
    pub fn stick_inputs(&self) -> Vec<InputId> {
        InputId::ALL
            .into_iter()
            .filter(|input| self.stick_policy(*input) != StickPolicy::Ignore)
            .collect()
    }

    fn insert_write_layers(&mut self, input: InputId, aim: Option<Aim>, cells: [&str; 3]) {
        for (modifier, text) in [None, Some(FN1), Some(FN2)].into_iter().zip(cells) {
            let binding = if text.is_empty() {
                Binding::Nothing
            } else {
                Binding::write(text)
            };
            self.insert(input, aim, modifier, binding);
        }
    }

    fn insert_hold_layers(&mut self, input: InputId, cells: [Option<Key>; 3]) {
        for (modifier, key) in [None, Some(FN1), Some(FN2)].into_iter().zip(cells) {
            let binding = key.map(Binding::Hold).unwrap_or(Binding::Nothing);
            self.insert(input, None, modifier, binding);
        }
    }

    /// The one-handed text layout the remapper ships with.
    ///
    /// Bumpers and triggers write characters chosen by the right stick (or,
    /// when it is centred, the left stick). The d-pad and face buttons hold
    /// navigation and editing keys. Both stick clicks select alternate layers.
    pub fn default_layout() -> Self {
        use Quadrant::{Down, Left, Right, Up};
        let mut table = Self::new();

        for input in [
            InputId::LeftBumper,
            InputId::RightBumper,
            InputId::RightTrigger,
            InputId::LeftTrigger,
        ] {
            table.set_stick_policy(input, StickPolicy::RightThenLeft);
        }

        let lb = InputId::LeftBumper;
        write_row!(table, lb, right(Up), "k", "K", "2");
        write_row!(table, lb, right(Down), "x", "X", "4");
        write_row!(table, lb, right(Right), "y", "Y", "3");
        write_row!(table, lb, right(Left), "u", "U", "1");
        write_row!(table, lb, left(Up), "(", "@", ")");
        write_row!(table, lb, left(Down), "w", "W", "#");
        write_row!(table, lb, left(Right), "<", "", ">");
        write_row!(table, lb, left(Left), "l", "L", "");
        write_row!(table, lb, None, "a", "A", "0");

        let rb = InputId::RightBumper;
        write_row!(table, rb, right(Up), "|", "^", "\\");
        write_row!(table, rb, right(Down), "'", "%", "\"");
        write_row!(table, rb, right(Right), "z", "Z", "");
        write_row!(table, rb, right(Left), "v", "V", "");
        write_row!(table, rb, left(Up), "c", "C", "7");
        write_row!(table, rb, left(Down), "m", "M", "9");
        write_row!(table, rb, left(Right), "s", "S", "8");
        write_row!(table, rb, left(Left), "g", "G", "6");
        write_row!(table, rb, None, "d", "D", "5");

        let rt = InputId::RightTrigger;
        write_row!(table, rt, right(Up), ".", "?", "!");
        write_row!(table, rt, right(Down), ":", ";", "");
        write_row!(table, rt, right(Right), ",", "", "");
        write_row!(table, rt, right(Left), "r", "R", "");
        write_row!(table, rt, left(Up), "b", "B", "");
        write_row!(table, rt, left(Down), "j", "J", "");
        write_row!(table, rt, left(Right), "o", "O", "");
        write_row!(table, rt, left(Left), "f", "F", "");
        write_row!(table, rt, None, "e", "E", "");

        let lt = InputId::LeftTrigger;
        write_row!(table, lt, right(Up), "q", "Q", "-");
        write_row!(table, lt, right(Down), "n", "N", "*");
        write_row!(table, lt, right(Right), "t", "T", "/");
        write_row!(table, lt, right(Left), "h", "H", "+");
        write_row!(table, lt, left(Up), "[", "`", "]");
        write_row!(table, lt, left(Down), "=", "", "$");
        write_row!(table, lt, left(Right), "{", "-", "}");
        write_row!(table, lt, left(Left), "p", "P", "_");
        write_row!(table, lt, None, "i", "I", "&");

        hold_row!(table, InputId::DPadUp, Some(Key::Up), None, None);
        hold_row!(table, InputId::DPadDown, Some(Key::Down), None, Some(Key::Control));
        hold_row!(table, InputId::DPadRight, Some(Key::Right), None, Some(Key::Home));
        hold_row!(table, InputId::DPadLeft, Some(Key::Left), None, None);
        hold_row!(table, InputId::A, Some(Key::Space), Some(Key::Enter), Some(Key::Tab));
        hold_row!(table, InputId::B, Some(Key::Backspace), Some(Key::Delete), None);
        hold_row!(table, InputId::X, Some(Key::AltGr), None, None);
        hold_row!(table, InputId::Y, Some(Key::Escape), None, None);

        table
    }

    /// Apply configured policies and bindings on top of this table
    pub fn extend_from_config(
        &mut self,
        policies: &HashMap<InputId, StickPolicy>,
        bindings: &[BindingConfig],
    ) -> Result<(), MappingError> {
        for (input, policy) in policies {
            self.set_stick_policy(*input, *policy);
        }
        for config in bindings {
            let (key, binding) = config.to_entry()?;
            let (input, aim, modifier) = key;
            if let Some(previous) = self.insert(input, aim, modifier, binding) {
                tracing::debug!("Configured binding replaces {:?} for {:?}", previous, key);
            }
        }
        Ok(())
    }
}

/// One `[[mapping.binding]]` entry of the settings file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub input: InputId,
    pub stick: Option<JoystickType>,
    pub quadrant: Option<Quadrant>,
    pub layer: Option<InputId>,
    pub write: Option<String>,
    pub hold: Option<Key>,
    #[serde(default)]
    pub nothing: bool,
}

impl BindingConfig {
    pub fn new(input: InputId) -> Self {
        Self {
            input,
            stick: None,
            quadrant: None,
            layer: None,
            write: None,
            hold: None,
            nothing: false,
        }
    }

    pub fn to_entry(&self) -> Result<(TableKey, Binding), MappingError> {
        let input = self.input;

        let aim = match (self.stick, self.quadrant) {
            (None, None) | (None, Some(Quadrant::Neutral)) => None,
            (Some(stick), Some(quadrant)) => {
                Some(Aim::new(stick, quadrant).ok_or(MappingError::IncompleteAim { input })?)
            }
            _ => return Err(MappingError::IncompleteAim { input }),
        };

        let binding = match (&self.write, self.hold, self.nothing) {
            (Some(text), None, false) if text.is_empty() => {
                return Err(MappingError::EmptyText { input })
            }
            (Some(text), None, false) => Binding::Write(text.clone()),
            (None, Some(key), false) => Binding::Hold(key),
            (None, None, true) => Binding::Nothing,
            _ => return Err(MappingError::AmbiguousBinding { input }),
        };

        Ok(((input, aim, self.layer), binding))
    }
}
