//! Error definitions for the mapping module

use super::input::InputId;
use thiserror::Error;

/// Errors raised while building an action table from configuration.
///
/// Dispatching itself never fails; everything here is caught at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// A binding names zero or several outputs
    #[error("Binding for {input} must set exactly one of `write`, `hold` or `nothing`")]
    AmbiguousBinding { input: InputId },

    /// A binding names a stick without a direction, or the other way round
    #[error("Binding for {input} must set `stick` and `quadrant` together, with a non-neutral quadrant")]
    IncompleteAim { input: InputId },

    /// A text binding with nothing to write
    #[error("Binding for {input} writes an empty string, use `nothing = true` instead")]
    EmptyText { input: InputId },

    /// The same modifier appears twice in the priority list
    #[error("Modifier {0} is listed more than once")]
    DuplicateModifier(InputId),

    /// The release threshold must sit below the press threshold
    #[error("Trigger release threshold {release_at_or_below} must be below the press threshold {press_above}")]
    InvalidTriggerThresholds {
        press_above: u8,
        release_at_or_below: u8,
    },

    #[error("Stick threshold must not be negative, got {0}")]
    NegativeStickThreshold(i16),
}
