//! Controller subsystem: where raw pad state comes from
//!
//! ```text
//! Gamepad ──► ReadingSource::poll ──► ControllerSnapshot
//!             (one call per slot and tick)
//! ```
//!
//! [`gilrs_source`] talks to real hardware, anything else implementing
//! [`ReadingSource`] can stand in for it.

pub mod gilrs_source;
pub mod snapshot;
pub mod source;

pub use gilrs_source::GilrsSource;
pub use snapshot::{ButtonType, ControllerSnapshot, JoystickType, StickPosition, TriggerType};
pub use source::{ReadingSource, SourceError, MAX_CONTROLLER_SLOTS};
