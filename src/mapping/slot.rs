//! Per-slot mapping state
//!
//! A [`SlotMapper`] owns everything one controller slot needs between polls:
//! the edge detector, the dispatcher with its held keys, and the settings used
//! to derive booleans and quadrants from a snapshot. Slots never share state.

use super::action::Action;
use super::dispatcher::Dispatcher;
use super::error::MappingError;
use super::input::{EdgeDetector, InputEvent, InputId, TriggerThresholds};
use super::modifier::ModifierPriority;
use super::quadrant::StickQuadrants;
use super::table::ActionTable;
use crate::controller::ControllerSnapshot;

/// Derivation settings shared by all slots
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotSettings {
    pub stick_threshold: i16,
    pub triggers: TriggerThresholds,
    pub modifiers: ModifierPriority,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            stick_threshold: super::quadrant::DEFAULT_STICK_THRESHOLD,
            triggers: TriggerThresholds::default(),
            modifiers: ModifierPriority::default(),
        }
    }
}

impl SlotSettings {
    /// Validated settings; a negative stick threshold would classify a centred
    /// stick as pushed.
    pub fn new(
        stick_threshold: i16,
        triggers: TriggerThresholds,
        modifiers: ModifierPriority,
    ) -> Result<Self, MappingError> {
        if stick_threshold < 0 {
            return Err(MappingError::NegativeStickThreshold(stick_threshold));
        }
        Ok(Self {
            stick_threshold,
            triggers,
            modifiers,
        })
    }
}

/// A transition and the action it produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatched {
    pub event: InputEvent,
    pub action: Action,
}

/// Everything derived from one snapshot
#[derive(Clone, Debug, Default)]
pub struct TickOutcome {
    pub sticks: StickQuadrants,
    pub modifier: Option<InputId>,
    pub dispatched: Vec<Dispatched>,
}

impl TickOutcome {
    /// Actions worth forwarding to a sink
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.dispatched
            .iter()
            .map(|d| &d.action)
            .filter(|action| !action.is_noop())
    }
}

#[derive(Clone, Debug)]
pub struct SlotMapper {
    index: u32,
    settings: SlotSettings,
    detector: EdgeDetector,
    dispatcher: Dispatcher,
}

impl SlotMapper {
    pub fn new(index: u32, table: ActionTable, settings: SlotSettings) -> Self {
        Self {
            index,
            settings,
            detector: EdgeDetector::new(),
            dispatcher: Dispatcher::new(table),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn table(&self) -> &ActionTable {
        self.dispatcher.table()
    }

    pub fn release_all(&mut self) -> Vec<Action> {
        self.dispatcher.release_all()
    }

    /// Run one tick: edge detection over every input, modifier resolution,
    /// then one dispatch per transition in poll order.
    pub fn process(&mut self, snapshot: &ControllerSnapshot) -> TickOutcome {
        let sticks = StickQuadrants::from_snapshot(snapshot, self.settings.stick_threshold);
        let events = self.detector.scan(snapshot, &self.settings.triggers);
        let modifier = self.settings.modifiers.resolve(&self.detector);

        let dispatched = events
            .into_iter()
            .map(|event| Dispatched {
                action: self.dispatcher.dispatch(&event, modifier, sticks),
                event,
            })
            .collect();

        TickOutcome {
            sticks,
            modifier,
            dispatched,
        }
    }
}
