//! Test doubles for the reading source and output sink

use crate::controller::{ControllerSnapshot, ReadingSource, SourceError};
use crate::mapping::{Action, Key};
use crate::output::OutputSink;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

type Reading = Result<ControllerSnapshot, SourceError>;

/// Replays a fixed list of readings per slot.
///
/// The last reading of a slot repeats forever and cancels `done` the first
/// time it is handed out. Slots without a script report `DeviceUnavailable`.
pub struct ScriptedSource {
    scripts: HashMap<u32, VecDeque<Reading>>,
    done: CancellationToken,
}

impl ScriptedSource {
    pub fn new(done: CancellationToken) -> Self {
        Self {
            scripts: HashMap::new(),
            done,
        }
    }

    pub fn script(mut self, index: u32, readings: Vec<Reading>) -> Self {
        self.scripts.insert(index, readings.into());
        self
    }
}

impl ReadingSource for ScriptedSource {
    fn poll(&mut self, index: u32) -> Reading {
        let Some(queue) = self.scripts.get_mut(&index) else {
            return Err(SourceError::DeviceUnavailable { index });
        };
        match queue.len() {
            0 => Err(SourceError::DeviceUnavailable { index }),
            1 => {
                self.done.cancel();
                queue[0].clone()
            }
            _ => queue
                .pop_front()
                .unwrap_or(Err(SourceError::DeviceUnavailable { index })),
        }
    }

    fn describe(&self, index: u32) -> Option<String> {
        self.scripts
            .contains_key(&index)
            .then(|| format!("scripted pad {}", index))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkCall {
    Press(Key),
    Release(Key),
    Write(String),
}

/// Records every sink call; clones share the same log
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl RecordingSink {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.calls()
            .into_iter()
            .map(|call| match call {
                SinkCall::Press(key) => Action::Press(key),
                SinkCall::Release(key) => Action::Release(key),
                SinkCall::Write(text) => Action::Write(text),
            })
            .collect()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl OutputSink for RecordingSink {
    fn press_key(&mut self, key: Key) {
        self.record(SinkCall::Press(key));
    }

    fn release_key(&mut self, key: Key) {
        self.record(SinkCall::Release(key));
    }

    fn write_text(&mut self, text: &str) {
        self.record(SinkCall::Write(text.to_string()));
    }
}
