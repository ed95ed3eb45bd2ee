//! Action dispatcher
//!
//! Turns one [`InputEvent`] into exactly one [`Action`]. Held keys are
//! remembered per input so the release always matches the press, even when
//! the layer or the sticks changed while the button was down.

use super::action::{Action, Binding, Key};
use super::input::{InputEvent, InputId, Transition};
use super::quadrant::StickQuadrants;
use super::table::ActionTable;
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct Dispatcher {
    table: ActionTable,
    held: HashMap<InputId, Key>,
}

impl Dispatcher {
    pub fn new(table: ActionTable) -> Self {
        Self {
            table,
            held: HashMap::new(),
        }
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    /// Key currently held on behalf of `input`, if any
    pub fn held_key(&self, input: InputId) -> Option<Key> {
        self.held.get(&input).copied()
    }

    /// Release every key still held, in poll order. Used when a slot goes
    /// away or the loop stops so no key is left stuck down.
    pub fn release_all(&mut self) -> Vec<Action> {
        let mut held: Vec<(InputId, Key)> = self.held.drain().collect();
        held.sort_by_key(|(input, _)| *input);
        held.into_iter().map(|(_, key)| Action::Release(key)).collect()
    }

    pub fn dispatch(
        &mut self,
        event: &InputEvent,
        modifier: Option<InputId>,
        sticks: StickQuadrants,
    ) -> Action {
        let input = event.input;
        let action = match event.transition {
            Transition::Pressed => {
                let aim = self.table.stick_policy(input).aim(sticks);
                match self.table.resolve(input, aim, modifier) {
                    Some(Binding::Write(text)) => Action::Write(text.clone()),
                    Some(Binding::Hold(key)) => {
                        let key = *key;
                        self.held.insert(input, key);
                        Action::Press(key)
                    }
                    Some(Binding::Nothing) | None => Action::NoOp,
                }
            }
            Transition::Released => match self.held.remove(&input) {
                Some(key) => Action::Release(key),
                None => Action::NoOp,
            },
        };
        debug!(
            "{} {:?} (layer {:?}, sticks {:?}) -> {}",
            input, event.transition, modifier, sticks, action
        );
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::input::EdgeDetector;
    use crate::mapping::quadrant::Quadrant;
    use crate::mapping::table::{FN1, FN2};

    fn event(input: InputId, transition: Transition) -> InputEvent {
        InputEvent { input, transition }
    }

    fn neutral() -> StickQuadrants {
        StickQuadrants::default()
    }

    #[test]
    fn momentary_write_on_press_only() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());
        let mut detector = EdgeDetector::new();
        let mut actions = Vec::new();

        for raw in [false, true, true, false] {
            if let Some(transition) = detector.update(InputId::LeftBumper, raw) {
                actions.push(dispatcher.dispatch(
                    &event(InputId::LeftBumper, transition),
                    None,
                    neutral(),
                ));
            }
        }

        assert_eq!(actions, vec![Action::Write("a".into()), Action::NoOp]);
    }

    #[test]
    fn hold_is_pressed_then_released() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());

        let press = dispatcher.dispatch(&event(InputId::DPadUp, Transition::Pressed), None, neutral());
        assert_eq!(press, Action::Press(Key::Up));
        assert_eq!(dispatcher.held_key(InputId::DPadUp), Some(Key::Up));

        let release =
            dispatcher.dispatch(&event(InputId::DPadUp, Transition::Released), None, neutral());
        assert_eq!(release, Action::Release(Key::Up));
        assert_eq!(dispatcher.held_key(InputId::DPadUp), None);
    }

    #[test]
    fn release_matches_the_pressed_key_after_layer_change() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());

        let press = dispatcher.dispatch(&event(InputId::A, Transition::Pressed), Some(FN2), neutral());
        assert_eq!(press, Action::Press(Key::Tab));

        let release = dispatcher.dispatch(&event(InputId::A, Transition::Released), None, neutral());
        assert_eq!(release, Action::Release(Key::Tab));
    }

    #[test]
    fn right_stick_selects_the_character() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());
        let sticks = StickQuadrants {
            left: Quadrant::Down,
            right: Quadrant::Up,
        };

        let action =
            dispatcher.dispatch(&event(InputId::RightTrigger, Transition::Pressed), Some(FN1), sticks);
        assert_eq!(action, Action::Write("?".into()));
    }

    #[test]
    fn left_stick_is_used_when_right_is_centred() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());
        let sticks = StickQuadrants {
            left: Quadrant::Right,
            right: Quadrant::Neutral,
        };

        let action = dispatcher.dispatch(&event(InputId::RightBumper, Transition::Pressed), None, sticks);
        assert_eq!(action, Action::Write("s".into()));
    }

    #[test]
    fn explicit_nothing_does_not_fall_back() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());
        let sticks = StickQuadrants {
            left: Quadrant::Neutral,
            right: Quadrant::Right,
        };

        let action =
            dispatcher.dispatch(&event(InputId::RightBumper, Transition::Pressed), Some(FN2), sticks);
        assert_eq!(action, Action::NoOp);
    }

    #[test]
    fn missing_aim_falls_back_to_neutral_entry() {
        let mut table = ActionTable::new();
        table.set_stick_policy(InputId::Start, crate::mapping::quadrant::StickPolicy::Left);
        table.insert(InputId::Start, None, None, Binding::write("!"));
        let mut dispatcher = Dispatcher::new(table);
        let sticks = StickQuadrants {
            left: Quadrant::Up,
            right: Quadrant::Neutral,
        };

        let action = dispatcher.dispatch(&event(InputId::Start, Transition::Pressed), None, sticks);
        assert_eq!(action, Action::Write("!".into()));
    }

    #[test]
    fn release_all_drains_held_keys() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());
        dispatcher.dispatch(&event(InputId::B, Transition::Pressed), None, neutral());
        dispatcher.dispatch(&event(InputId::DPadDown, Transition::Pressed), Some(FN2), neutral());

        assert_eq!(
            dispatcher.release_all(),
            vec![Action::Release(Key::Control), Action::Release(Key::Backspace)]
        );
        assert!(dispatcher.release_all().is_empty());
        let late = dispatcher.dispatch(&event(InputId::B, Transition::Released), None, neutral());
        assert_eq!(late, Action::NoOp);
    }

    #[test]
    fn unmapped_input_is_noop_both_ways() {
        let mut dispatcher = Dispatcher::new(ActionTable::default_layout());
        let press = dispatcher.dispatch(&event(InputId::Guide, Transition::Pressed), None, neutral());
        let release = dispatcher.dispatch(&event(InputId::Guide, Transition::Released), None, neutral());
        assert_eq!(press, Action::NoOp);
        assert_eq!(release, Action::NoOp);
    }
}
