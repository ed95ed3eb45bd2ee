//! Turning controller snapshots into keyboard actions.
//!
//! ```text
//! ControllerSnapshot ──► EdgeDetector ──► InputEvent ──► Dispatcher ──► Action
//!        │                    │                              ▲
//!        └──► StickQuadrants  └──► ModifierPriority ─────────┘
//! ```
//!
//! Everything in here is pure and total; hardware and OS access live in
//! [`crate::controller`] and [`crate::output`].

pub mod action;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod hint;
pub mod input;
pub mod modifier;
pub mod quadrant;
pub mod slot;
pub mod table;

pub use action::{Action, Binding, Key};
pub use dispatcher::Dispatcher;
pub use engine::{EngineError, EngineSettings, PollEngine};
pub use error::MappingError;
pub use input::{EdgeDetector, InputEvent, InputId, TrackedInput, Transition, TriggerThresholds};
pub use modifier::ModifierPriority;
pub use quadrant::{classify, Aim, Quadrant, StickPolicy, StickQuadrants};
pub use slot::{SlotMapper, SlotSettings};
pub use table::{ActionTable, BindingConfig};
