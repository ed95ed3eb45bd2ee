//! gilrs backed reading source
//!
//! gilrs keeps a cached state per gamepad that is only refreshed while its
//! event queue is drained. Every [`ReadingSource::poll`] therefore pumps the
//! queue first and then reads the cached state of the requested slot in one
//! go, so all facts of a snapshot come from the same moment.

use super::snapshot::{ButtonType, ControllerSnapshot, StickPosition};
use super::source::{ReadingSource, SourceError};
use chrono::Local;
use gilrs::{Axis, Button, Event, EventType, Gamepad, Gilrs};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

const BUTTONS: [(Button, ButtonType); 15] = [
    (Button::South, ButtonType::A),
    (Button::East, ButtonType::B),
    (Button::West, ButtonType::X),
    (Button::North, ButtonType::Y),
    (Button::Start, ButtonType::Start),
    (Button::Select, ButtonType::Select),
    (Button::Mode, ButtonType::Guide),
    (Button::LeftTrigger, ButtonType::LeftBumper),
    (Button::RightTrigger, ButtonType::RightBumper),
    (Button::LeftThumb, ButtonType::LeftStick),
    (Button::RightThumb, ButtonType::RightStick),
    (Button::DPadUp, ButtonType::DPadUp),
    (Button::DPadDown, ButtonType::DPadDown),
    (Button::DPadLeft, ButtonType::DPadLeft),
    (Button::DPadRight, ButtonType::DPadRight),
];

pub struct GilrsSource {
    gilrs: Gilrs,
}

impl GilrsSource {
    pub fn create() -> Result<Self, SourceError> {
        info!("Initializing gilrs controller interface");
        match Gilrs::new() {
            Ok(gilrs) => {
                info!("Successfully initialized gilrs");
                Ok(Self { gilrs })
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                Err(SourceError::ReadError {
                    index: 0,
                    reason: format!("gilrs initialization failed: {}", e),
                })
            }
        }
    }

    fn pump_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Controller connected at slot {}", usize::from(id))
                }
                EventType::Disconnected => {
                    warn!("Controller disconnected from slot {}", usize::from(id))
                }
                _ => {}
            }
        }
    }

    fn gamepad(&self, index: u32) -> Option<Gamepad<'_>> {
        self.gilrs
            .gamepads()
            .find(|(id, _)| usize::from(*id) == index as usize)
            .map(|(_, gamepad)| gamepad)
    }
}

impl ReadingSource for GilrsSource {
    fn poll(&mut self, index: u32) -> Result<ControllerSnapshot, SourceError> {
        self.pump_events();

        let gamepad = self
            .gamepad(index)
            .ok_or(SourceError::DeviceUnavailable { index })?;
        if !gamepad.is_connected() {
            return Err(SourceError::DeviceUnavailable { index });
        }

        let buttons: HashSet<ButtonType> = BUTTONS
            .iter()
            .filter(|(button, _)| gamepad.is_pressed(*button))
            .map(|(_, button_type)| *button_type)
            .collect();

        let snapshot = ControllerSnapshot {
            buttons,
            left_trigger: trigger_value(&gamepad, Button::LeftTrigger2, Axis::LeftZ),
            right_trigger: trigger_value(&gamepad, Button::RightTrigger2, Axis::RightZ),
            left_stick: StickPosition::new(
                scale_axis(gamepad.value(Axis::LeftStickX)),
                scale_axis(gamepad.value(Axis::LeftStickY)),
            ),
            right_stick: StickPosition::new(
                scale_axis(gamepad.value(Axis::RightStickX)),
                scale_axis(gamepad.value(Axis::RightStickY)),
            ),
            timestamp: Local::now(),
        };
        debug!("Polled slot {}: {:?}", index, snapshot);
        Ok(snapshot)
    }

    fn describe(&self, index: u32) -> Option<String> {
        self.gamepad(index).map(|gamepad| gamepad.name().to_string())
    }
}

// Analog triggers are reported as buttons with a value on most backends,
// some platforms only expose the Z axes.
fn trigger_value(gamepad: &Gamepad<'_>, button: Button, axis: Axis) -> u8 {
    let value = match gamepad.button_data(button) {
        Some(data) => data.value(),
        None => gamepad.value(axis),
    };
    scale_trigger(value)
}

/// Map a normalized axis value (-1.0..=1.0, up positive) to the pad's i16 range
pub fn scale_axis(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Map a normalized trigger value (0.0..=1.0) to 0..=255
pub fn scale_trigger(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * u8::MAX as f32).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_scaling_covers_the_signed_range() {
        assert_eq!(scale_axis(0.0), 0);
        assert_eq!(scale_axis(1.0), 32767);
        assert_eq!(scale_axis(-1.0), -32767);
        assert_eq!(scale_axis(2.5), 32767);
        assert!(scale_axis(0.7) > 20000);
    }

    #[test]
    fn trigger_scaling_clamps_negative_rest_values() {
        assert_eq!(scale_trigger(-1.0), 0);
        assert_eq!(scale_trigger(0.0), 0);
        assert_eq!(scale_trigger(1.0), 255);
        assert_eq!(scale_trigger(0.5), 128);
    }
}
