//! Output sinks: where dispatched actions end up
//!
//! Sink calls are fire-and-forget. The polling loop never looks at a result,
//! so implementations log their own failures and carry on.

pub mod rdev_sink;

pub use rdev_sink::RdevSink;

use crate::mapping::{Action, Key};
use tracing::info;

pub trait OutputSink {
    fn press_key(&mut self, key: Key);
    fn release_key(&mut self, key: Key);
    fn write_text(&mut self, text: &str);

    /// Forward one dispatched action; `NoOp` never reaches the sink methods
    fn apply(&mut self, action: &Action) {
        match action {
            Action::Press(key) => self.press_key(*key),
            Action::Release(key) => self.release_key(*key),
            Action::Write(text) => self.write_text(text),
            Action::NoOp => {}
        }
    }
}

/// Dry-run sink that only logs what would have been sent
#[derive(Debug, Default)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn press_key(&mut self, key: Key) {
        info!("[dry-run] press {}", key);
    }

    fn release_key(&mut self, key: Key) {
        info!("[dry-run] release {}", key);
    }

    fn write_text(&mut self, text: &str) {
        info!("[dry-run] write {:?}", text);
    }
}
