//! Reading source abstraction
//!
//! The polling loop never talks to hardware directly. It asks a
//! [`ReadingSource`] for one [`ControllerSnapshot`] per slot and tick; the
//! concrete source decides how that snapshot is produced.

use super::snapshot::ControllerSnapshot;

/// Number of controller slots probed at startup (XInput's `XUSER_MAX_COUNT`)
pub const MAX_CONTROLLER_SLOTS: u32 = 4;

/// Errors a reading source may report for a single poll
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// No controller is connected at the requested slot
    #[error("No controller connected at slot {index}")]
    DeviceUnavailable { index: u32 },

    /// The platform call failed for any other reason
    #[error("Failed to read controller {index}: {reason}")]
    ReadError { index: u32, reason: String },
}

impl SourceError {
    pub fn index(&self) -> u32 {
        match self {
            SourceError::DeviceUnavailable { index } => *index,
            SourceError::ReadError { index, .. } => *index,
        }
    }
}

/// Supplies controller snapshots on demand.
///
/// `poll` is a blocking call with no internal retry. Callers decide what a
/// failure means for them.
pub trait ReadingSource {
    fn poll(&mut self, index: u32) -> Result<ControllerSnapshot, SourceError>;

    /// Human readable name of the device at `index`, if the backend knows one
    fn describe(&self, _index: u32) -> Option<String> {
        None
    }
}
