//! Stick quadrant classification

use crate::controller::{ControllerSnapshot, JoystickType, StickPosition};
use serde::{Deserialize, Serialize};

/// Default deflection an axis must exceed to count, about 61% of full travel
pub const DEFAULT_STICK_THRESHOLD: i16 = 20000;

/// Discretised stick direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    Up,
    Down,
    Left,
    Right,
    #[default]
    Neutral,
}

/// Classify one stick deflection.
///
/// The vertical axis is checked first, so a diagonal push past the threshold
/// on both axes reports `Up` or `Down`. Existing mapping tables rely on this.
pub fn classify(x: i16, y: i16, threshold: i16) -> Quadrant {
    let (x, y, t) = (i32::from(x), i32::from(y), i32::from(threshold));
    if y > t {
        Quadrant::Up
    } else if y < -t {
        Quadrant::Down
    } else if x > t {
        Quadrant::Right
    } else if x < -t {
        Quadrant::Left
    } else {
        Quadrant::Neutral
    }
}

/// Quadrants of both sticks for one poll
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StickQuadrants {
    pub left: Quadrant,
    pub right: Quadrant,
}

impl StickQuadrants {
    pub fn from_snapshot(snapshot: &ControllerSnapshot, threshold: i16) -> Self {
        let of = |p: StickPosition| classify(p.x, p.y, threshold);
        Self {
            left: of(snapshot.left_stick),
            right: of(snapshot.right_stick),
        }
    }

    pub fn of(&self, stick: JoystickType) -> Quadrant {
        match stick {
            JoystickType::Left => self.left,
            JoystickType::Right => self.right,
        }
    }
}

/// A stick pushed into a non-neutral quadrant, used as part of a table key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Aim {
    pub stick: JoystickType,
    pub quadrant: Quadrant,
}

impl Aim {
    /// `None` when the stick is neutral
    pub fn new(stick: JoystickType, quadrant: Quadrant) -> Option<Self> {
        match quadrant {
            Quadrant::Neutral => None,
            quadrant => Some(Self { stick, quadrant }),
        }
    }
}

/// Which stick(s) an input consults when it is dispatched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickPolicy {
    #[default]
    Ignore,
    Left,
    Right,
    RightThenLeft,
    LeftThenRight,
}

impl StickPolicy {
    pub fn aim(self, sticks: StickQuadrants) -> Option<Aim> {
        let at = |stick| Aim::new(stick, sticks.of(stick));
        match self {
            StickPolicy::Ignore => None,
            StickPolicy::Left => at(JoystickType::Left),
            StickPolicy::Right => at(JoystickType::Right),
            StickPolicy::RightThenLeft => at(JoystickType::Right).or_else(|| at(JoystickType::Left)),
            StickPolicy::LeftThenRight => at(JoystickType::Left).or_else(|| at(JoystickType::Right)),
        }
    }
}
