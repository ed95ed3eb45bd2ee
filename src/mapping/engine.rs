//! Polling engine with statum state machine
//!
//! Drives every configured controller slot through one tick per poll
//! interval. Each tick reads one snapshot per slot, runs the slot's
//! [`SlotMapper`] and forwards the resulting actions to the output sink.
//!
//! # State Machine
//!
//! ```text
//!        ┌──────── poll ────────┐
//!        │                      ▼
//!      Idle ◄──── dispatch ── Dispatching(TickBatch)
//! ```
//!
//! Cancellation is only observed in `Idle`, between ticks, so a tick that has
//! started always finishes dispatching.

use super::hint::layer_hint;
use super::input::InputId;
use super::quadrant::StickQuadrants;
use super::slot::SlotMapper;
use crate::controller::{ControllerSnapshot, ReadingSource, SourceError, MAX_CONTROLLER_SLOTS};
use crate::output::OutputSink;
use chrono::{DateTime, Local};
use statum::{machine, state};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Engine errors that end the polling loop
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The first requested slot has no usable controller at startup
    #[error("Primary controller slot {index} is not available: {cause}")]
    PrimaryUnavailable {
        index: u32,
        #[source]
        cause: SourceError,
    },

    /// The primary slot failed too many polls in a row
    #[error("Giving up on slot {index} after {count} consecutive read errors: {last}")]
    SustainedReadFailure {
        index: u32,
        count: u32,
        last: SourceError,
    },

    #[error("No controller slot requested")]
    NoSlots,
}

#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub poll_interval: Duration,
    /// Consecutive failed polls of the primary slot before giving up
    pub max_consecutive_read_errors: u32,
    pub layer_hints: bool,
    pub stats_interval_secs: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1),
            max_consecutive_read_errors: 1000,
            layer_hints: true,
            stats_interval_secs: 10,
        }
    }
}

/// Counters reported when the loop ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub actions: u64,
    pub read_errors: u64,
    /// Layer hints shown for the primary slot
    pub hints: u64,
}

impl PollStats {
    fn since(&self, before: &PollStats) -> PollStats {
        PollStats {
            ticks: self.ticks - before.ticks,
            actions: self.actions - before.actions,
            read_errors: self.read_errors - before.read_errors,
            hints: self.hints - before.hints,
        }
    }

    fn add(&mut self, other: &PollStats) {
        self.ticks += other.ticks;
        self.actions += other.actions;
        self.read_errors += other.read_errors;
        self.hints += other.hints;
    }
}

/// Accumulates counters for the periodic stats line
#[derive(Clone, Debug)]
struct StatsWindow {
    interval: chrono::Duration,
    started: DateTime<Local>,
    counts: PollStats,
}

impl StatsWindow {
    fn new(interval: chrono::Duration, now: DateTime<Local>) -> Self {
        Self {
            interval,
            started: now,
            counts: PollStats::default(),
        }
    }

    fn record(&mut self, delta: &PollStats) {
        self.counts.add(delta);
    }

    /// Counts of the finished window, once `interval` has passed since it started
    fn take_if_due(&mut self, now: DateTime<Local>) -> Option<PollStats> {
        if now - self.started <= self.interval {
            return None;
        }
        self.started = now;
        Some(std::mem::take(&mut self.counts))
    }
}

/// Readings of one tick, in slot order
#[derive(Debug, Clone)]
pub struct TickBatch {
    pub readings: Vec<Result<ControllerSnapshot, SourceError>>,
}

#[state]
#[derive(Debug, Clone)]
pub enum PollState {
    Idle,
    Dispatching(TickBatch),
}

/// Per-slot bookkeeping kept by the engine
pub struct Slot {
    mapper: SlotMapper,
    consecutive_errors: u32,
    last_view: Option<(StickQuadrants, Option<InputId>)>,
}

#[machine]
pub struct PollEngine<S: PollState> {
    source: Box<dyn ReadingSource>,
    sink: Box<dyn OutputSink>,
    slots: Vec<Slot>,
    settings: EngineSettings,
    stats: PollStats,
}

impl<S: PollState> PollEngine<S> {
    pub fn stats(&self) -> PollStats {
        self.stats
    }

    fn release_all_held(&mut self) {
        for slot in &mut self.slots {
            for action in slot.mapper.release_all() {
                info!("Slot {}: {} (cleanup)", slot.mapper.index(), action);
                self.sink.apply(&action);
            }
        }
    }
}

impl PollEngine<Idle> {
    /// Build an idle engine. The first mapper is the primary slot.
    pub fn create(
        source: Box<dyn ReadingSource>,
        sink: Box<dyn OutputSink>,
        mappers: Vec<SlotMapper>,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        if mappers.is_empty() {
            return Err(EngineError::NoSlots);
        }
        info!(
            "Creating poll engine for slots {:?} with {:?}",
            mappers.iter().map(|m| m.index()).collect::<Vec<_>>(),
            settings
        );

        let slots = mappers
            .into_iter()
            .map(|mapper| Slot {
                mapper,
                consecutive_errors: 0,
                last_view: None,
            })
            .collect();

        Ok(Self::new(source, sink, slots, settings, PollStats::default()))
    }

    /// Acquire exactly one snapshot per slot
    pub fn poll(mut self) -> PollEngine<Dispatching> {
        let indices: Vec<u32> = self.slots.iter().map(|s| s.mapper.index()).collect();
        let readings = indices
            .into_iter()
            .map(|index| self.source.poll(index))
            .collect();

        self.transition_with(TickBatch { readings })
    }

    /// Tick until `cancel` fires or the primary slot keeps failing
    pub async fn run_until_cancelled(
        self,
        cancel: CancellationToken,
    ) -> Result<PollStats, EngineError> {
        info!(
            "Starting poll loop with {}ms interval",
            self.settings.poll_interval.as_millis()
        );

        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let stats_interval = chrono::Duration::seconds(self.settings.stats_interval_secs);
        let mut window = StatsWindow::new(stats_interval, Local::now());
        let mut engine = self;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Cancellation requested, stopping poll loop");
                    break;
                }

                _ = ticker.tick() => {
                    let before = engine.stats;
                    engine = engine.poll().dispatch()?;
                    window.record(&engine.stats.since(&before));

                    if let Some(counts) = window.take_if_due(Local::now()) {
                        info!(
                            "Poll stats: {} ticks, {} actions, {} read errors in last {} seconds",
                            counts.ticks,
                            counts.actions,
                            counts.read_errors,
                            stats_interval.num_seconds()
                        );
                    }
                }
            }
        }

        engine.release_all_held();
        info!("Poll loop finished: {:?}", engine.stats);
        Ok(engine.stats)
    }
}

impl PollEngine<Dispatching> {
    /// Map this tick's readings and forward the actions, then go back to idle
    pub fn dispatch(mut self) -> Result<PollEngine<Idle>, EngineError> {
        let readings = match self.get_state_data() {
            Some(batch) => batch.readings.clone(),
            None => {
                warn!("No tick batch found in state data, this should not happen");
                Vec::new()
            }
        };

        self.stats.ticks += 1;
        let max_errors = self.settings.max_consecutive_read_errors;

        for (position, reading) in readings.into_iter().enumerate() {
            let primary = position == 0;
            let slot = &mut self.slots[position];
            let index = slot.mapper.index();

            match reading {
                Ok(snapshot) => {
                    if slot.consecutive_errors > 0 {
                        info!(
                            "Slot {} readable again after {} errors",
                            index, slot.consecutive_errors
                        );
                    }
                    slot.consecutive_errors = 0;

                    let outcome = slot.mapper.process(&snapshot);
                    for action in outcome.actions() {
                        info!("Slot {}: {}", index, action);
                        self.sink.apply(action);
                        self.stats.actions += 1;
                    }

                    let view = (outcome.sticks, outcome.modifier);
                    if primary && self.settings.layer_hints && slot.last_view != Some(view) {
                        let hint = layer_hint(slot.mapper.table(), view.0, view.1);
                        if !hint.is_empty() {
                            info!("{}", hint);
                            self.stats.hints += 1;
                        }
                    }
                    slot.last_view = Some(view);
                }
                Err(e) => {
                    self.stats.read_errors += 1;
                    slot.consecutive_errors += 1;
                    if slot.consecutive_errors == 1 {
                        warn!("{}", e);
                        for action in slot.mapper.release_all() {
                            info!("Slot {}: {} (device lost)", index, action);
                            self.sink.apply(&action);
                        }
                    } else {
                        debug!("{} ({} in a row)", e, slot.consecutive_errors);
                    }

                    if primary && slot.consecutive_errors >= max_errors {
                        let count = slot.consecutive_errors;
                        error!("Primary slot {} failed {} polls in a row", index, count);
                        self.release_all_held();
                        return Err(EngineError::SustainedReadFailure {
                            index,
                            count,
                            last: e,
                        });
                    }
                }
            }
        }

        Ok(self.transition())
    }
}

/// Availability of one slot as seen at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotReport {
    pub index: u32,
    pub name: Option<String>,
    pub status: Result<(), SourceError>,
}

/// Probe every slot once and report what answers
pub fn enumerate_slots(source: &mut dyn ReadingSource) -> Vec<SlotReport> {
    (0..MAX_CONTROLLER_SLOTS)
        .map(|index| {
            let status = source.poll(index).map(|_| ());
            match &status {
                Ok(()) => info!("Reading input from controller {}", index),
                Err(e) => info!("Controller {} not available: {}", index, e),
            }
            SlotReport {
                index,
                name: source.describe(index),
                status,
            }
        })
        .collect()
}

/// Keep the requested slots that can be read right now.
///
/// The first requested slot is the primary one and must be available;
/// unavailable secondary slots are skipped.
pub fn select_slots(
    source: &mut dyn ReadingSource,
    requested: &[u32],
) -> Result<Vec<u32>, EngineError> {
    let (&primary, rest) = requested.split_first().ok_or(EngineError::NoSlots)?;

    if let Err(cause) = source.poll(primary) {
        return Err(EngineError::PrimaryUnavailable {
            index: primary,
            cause,
        });
    }

    let mut selected = vec![primary];
    for &index in rest {
        if selected.contains(&index) {
            warn!("Slot {} requested twice, ignoring duplicate", index);
            continue;
        }
        match source.poll(index) {
            Ok(_) => selected.push(index),
            Err(e) => warn!("Skipping slot {}: {}", index, e),
        }
    }
    Ok(selected)
}
