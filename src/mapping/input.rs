//! Tracked inputs and the edge detector
//!
//! Every logical input owns a single `active` flag. The detector compares the
//! current boolean reading against that flag and only reports a
//! [`Transition`] when the two differ, which is what keeps a held button from
//! spamming its action on every poll.

use super::error::MappingError;
use crate::controller::{ButtonType, ControllerSnapshot, TriggerType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One logical controller input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputId {
    LeftStick,
    RightStick,
    LeftBumper,
    RightBumper,
    RightTrigger,
    LeftTrigger,
    DPadUp,
    DPadDown,
    DPadRight,
    DPadLeft,
    A,
    B,
    X,
    Y,
    Start,
    Select,
    Guide,
}

impl InputId {
    /// Fixed iteration order used for every poll
    pub const ALL: [InputId; 17] = [
        InputId::LeftStick,
        InputId::RightStick,
        InputId::LeftBumper,
        InputId::RightBumper,
        InputId::RightTrigger,
        InputId::LeftTrigger,
        InputId::DPadUp,
        InputId::DPadDown,
        InputId::DPadRight,
        InputId::DPadLeft,
        InputId::A,
        InputId::B,
        InputId::X,
        InputId::Y,
        InputId::Start,
        InputId::Select,
        InputId::Guide,
    ];

    /// Trigger inputs are derived from an analog magnitude, everything else is a button
    pub fn trigger(self) -> Option<TriggerType> {
        match self {
            InputId::LeftTrigger => Some(TriggerType::Left),
            InputId::RightTrigger => Some(TriggerType::Right),
            _ => None,
        }
    }

    pub fn button(self) -> Option<ButtonType> {
        let button = match self {
            InputId::LeftStick => ButtonType::LeftStick,
            InputId::RightStick => ButtonType::RightStick,
            InputId::LeftBumper => ButtonType::LeftBumper,
            InputId::RightBumper => ButtonType::RightBumper,
            InputId::DPadUp => ButtonType::DPadUp,
            InputId::DPadDown => ButtonType::DPadDown,
            InputId::DPadRight => ButtonType::DPadRight,
            InputId::DPadLeft => ButtonType::DPadLeft,
            InputId::A => ButtonType::A,
            InputId::B => ButtonType::B,
            InputId::X => ButtonType::X,
            InputId::Y => ButtonType::Y,
            InputId::Start => ButtonType::Start,
            InputId::Select => ButtonType::Select,
            InputId::Guide => ButtonType::Guide,
            InputId::LeftTrigger | InputId::RightTrigger => return None,
        };
        Some(button)
    }

    /// Short label used in layer hints
    pub fn label(self) -> &'static str {
        match self {
            InputId::LeftStick => "LS",
            InputId::RightStick => "RS",
            InputId::LeftBumper => "LB",
            InputId::RightBumper => "RB",
            InputId::RightTrigger => "RT",
            InputId::LeftTrigger => "LT",
            InputId::DPadUp => "Up",
            InputId::DPadDown => "Down",
            InputId::DPadRight => "Right",
            InputId::DPadLeft => "Left",
            InputId::A => "A",
            InputId::B => "B",
            InputId::X => "X",
            InputId::Y => "Y",
            InputId::Start => "Start",
            InputId::Select => "Select",
            InputId::Guide => "Guide",
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Edge emitted when a tracked input changes state between polls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Pressed,
    Released,
}

/// A transition together with the input it happened on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub input: InputId,
    pub transition: Transition,
}

/// Per-input edge state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackedInput {
    pub id: InputId,
    pub active: bool,
}

impl TrackedInput {
    pub fn new(id: InputId) -> Self {
        Self { id, active: false }
    }
}

/// Press/release thresholds for the analog triggers.
///
/// A trigger turns on above `press_above` and stays on until the magnitude
/// drops to `release_at_or_below`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerThresholds {
    pub press_above: u8,
    pub release_at_or_below: u8,
}

impl Default for TriggerThresholds {
    fn default() -> Self {
        Self {
            press_above: 100,
            release_at_or_below: 0,
        }
    }
}

impl TriggerThresholds {
    /// Thresholds where `release_at_or_below >= press_above` would let a
    /// steady pull flip the trigger on every poll, so they are rejected.
    pub fn new(press_above: u8, release_at_or_below: u8) -> Result<Self, MappingError> {
        if release_at_or_below >= press_above {
            return Err(MappingError::InvalidTriggerThresholds {
                press_above,
                release_at_or_below,
            });
        }
        Ok(Self {
            press_above,
            release_at_or_below,
        })
    }

    pub fn derive(&self, magnitude: u8, currently_active: bool) -> bool {
        if currently_active {
            magnitude > self.release_at_or_below
        } else {
            magnitude > self.press_above
        }
    }
}

/// Edge detector over all tracked inputs of one controller slot
#[derive(Clone, Debug)]
pub struct EdgeDetector {
    inputs: HashMap<InputId, TrackedInput>,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeDetector {
    pub fn new() -> Self {
        let inputs = InputId::ALL
            .iter()
            .map(|id| (*id, TrackedInput::new(*id)))
            .collect();
        Self { inputs }
    }

    /// Store `raw` for `id` and report whether that was a state change
    pub fn update(&mut self, id: InputId, raw: bool) -> Option<Transition> {
        let tracked = self
            .inputs
            .entry(id)
            .or_insert_with(|| TrackedInput::new(id));

        match (tracked.active, raw) {
            (false, true) => {
                tracked.active = true;
                Some(Transition::Pressed)
            }
            (true, false) => {
                tracked.active = false;
                Some(Transition::Released)
            }
            _ => None,
        }
    }

    pub fn is_active(&self, id: InputId) -> bool {
        self.inputs.get(&id).map(|t| t.active).unwrap_or(false)
    }

    /// Boolean reading of `id` in `snapshot`, trigger hysteresis included
    pub fn reading(
        &self,
        id: InputId,
        snapshot: &ControllerSnapshot,
        thresholds: &TriggerThresholds,
    ) -> bool {
        match (id.button(), id.trigger()) {
            (Some(button), _) => snapshot.is_pressed(button),
            (None, Some(trigger)) => {
                thresholds.derive(snapshot.trigger(trigger), self.is_active(id))
            }
            (None, None) => false,
        }
    }

    /// Run one full pass over [`InputId::ALL`] and collect the transitions in order
    pub fn scan(
        &mut self,
        snapshot: &ControllerSnapshot,
        thresholds: &TriggerThresholds,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for id in InputId::ALL {
            let raw = self.reading(id, snapshot, thresholds);
            if let Some(transition) = self.update(id, raw) {
                events.push(InputEvent {
                    input: id,
                    transition,
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_reading_yields_a_single_transition() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.update(InputId::A, true), Some(Transition::Pressed));
        assert_eq!(detector.update(InputId::A, true), None);
        assert_eq!(detector.update(InputId::A, false), Some(Transition::Released));
        assert_eq!(detector.update(InputId::A, false), None);
    }

    #[test]
    fn initial_false_reading_is_silent() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.update(InputId::B, false), None);
        assert!(!detector.is_active(InputId::B));
    }

    #[test]
    fn presses_never_run_ahead_of_releases() {
        let readings = [
            true, true, false, true, false, false, true, true, true, false, true,
        ];
        let mut detector = EdgeDetector::new();
        let (mut pressed, mut released) = (0, 0);

        for raw in readings {
            match detector.update(InputId::X, raw) {
                Some(Transition::Pressed) => pressed += 1,
                Some(Transition::Released) => released += 1,
                None => {}
            }
            assert!(pressed - released <= 1);
            assert!(pressed >= released);
            if !detector.is_active(InputId::X) {
                assert_eq!(pressed, released);
            }
        }
    }

    #[test]
    fn inputs_are_tracked_independently() {
        let mut detector = EdgeDetector::new();
        assert_eq!(detector.update(InputId::A, true), Some(Transition::Pressed));
        assert_eq!(detector.update(InputId::B, true), Some(Transition::Pressed));
        assert_eq!(detector.update(InputId::A, false), Some(Transition::Released));
        assert!(detector.is_active(InputId::B));
    }

    #[test]
    fn trigger_uses_hysteresis() {
        let thresholds = TriggerThresholds::default();
        let mut detector = EdgeDetector::new();
        let mut transitions = Vec::new();

        for magnitude in [150u8, 50, 0, 80, 101] {
            let snapshot =
                ControllerSnapshot::default().with_trigger(TriggerType::Right, magnitude);
            transitions.push(detector.scan(&snapshot, &thresholds));
        }

        let pressed = |input| InputEvent {
            input,
            transition: Transition::Pressed,
        };
        let released = |input| InputEvent {
            input,
            transition: Transition::Released,
        };
        assert_eq!(transitions[0], vec![pressed(InputId::RightTrigger)]);
        assert!(transitions[1].is_empty());
        assert_eq!(transitions[2], vec![released(InputId::RightTrigger)]);
        assert!(transitions[3].is_empty());
        assert_eq!(transitions[4], vec![pressed(InputId::RightTrigger)]);
    }

    #[test]
    fn scan_reports_in_fixed_order() {
        let mut detector = EdgeDetector::new();
        let snapshot = ControllerSnapshot::default()
            .with_button(ButtonType::Y)
            .with_button(ButtonType::LeftBumper)
            .with_button(ButtonType::DPadUp);

        let inputs: Vec<InputId> = detector
            .scan(&snapshot, &TriggerThresholds::default())
            .into_iter()
            .map(|e| e.input)
            .collect();
        assert_eq!(inputs, vec![InputId::LeftBumper, InputId::DPadUp, InputId::Y]);
    }

    #[test]
    fn inverted_trigger_thresholds_are_rejected() {
        assert_eq!(
            TriggerThresholds::new(100, 200),
            Err(MappingError::InvalidTriggerThresholds {
                press_above: 100,
                release_at_or_below: 200,
            })
        );
        assert!(TriggerThresholds::new(100, 100).is_err());
        assert_eq!(TriggerThresholds::new(100, 0), Ok(TriggerThresholds::default()));
    }

    #[test]
    fn steady_pull_between_thresholds_presses_once() {
        let thresholds = TriggerThresholds::new(100, 20).unwrap();
        let mut detector = EdgeDetector::new();
        let snapshot = ControllerSnapshot::default().with_trigger(TriggerType::Right, 150);

        let events: Vec<InputEvent> = (0..6)
            .flat_map(|_| detector.scan(&snapshot, &thresholds))
            .collect();
        assert_eq!(
            events,
            vec![InputEvent {
                input: InputId::RightTrigger,
                transition: Transition::Pressed,
            }]
        );
    }
}
