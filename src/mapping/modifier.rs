//! Layer modifier resolution

use super::error::MappingError;
use super::input::{EdgeDetector, InputId};
use super::table::{FN1, FN2};

/// Ordered list of layer modifiers, highest priority first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifierPriority {
    order: Vec<InputId>,
}

impl Default for ModifierPriority {
    fn default() -> Self {
        Self {
            order: vec![FN1, FN2],
        }
    }
}

impl ModifierPriority {
    pub fn new(order: Vec<InputId>) -> Result<Self, MappingError> {
        for (i, input) in order.iter().enumerate() {
            if order[..i].contains(input) {
                return Err(MappingError::DuplicateModifier(*input));
            }
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> &[InputId] {
        &self.order
    }

    pub fn contains(&self, input: InputId) -> bool {
        self.order.contains(&input)
    }

    /// First modifier in priority order that is currently held
    pub fn resolve(&self, detector: &EdgeDetector) -> Option<InputId> {
        self.resolve_with(|input| detector.is_active(input))
    }

    pub fn resolve_with(&self, is_active: impl Fn(InputId) -> bool) -> Option<InputId> {
        self.order.iter().copied().find(|input| is_active(*input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priority_wins_when_both_are_held() {
        let priority = ModifierPriority::new(vec![InputId::Select, InputId::Start]).unwrap();
        let mut detector = EdgeDetector::new();
        detector.update(InputId::Start, true);
        detector.update(InputId::Select, true);

        assert_eq!(priority.resolve(&detector), Some(InputId::Select));

        detector.update(InputId::Select, false);
        assert_eq!(priority.resolve(&detector), Some(InputId::Start));

        detector.update(InputId::Start, false);
        assert_eq!(priority.resolve(&detector), None);
    }

    #[test]
    fn default_order_is_left_then_right_stick_click() {
        let priority = ModifierPriority::default();
        assert_eq!(
            priority.resolve_with(|_| true),
            Some(InputId::LeftStick)
        );
        assert_eq!(
            priority.resolve_with(|input| input == InputId::RightStick),
            Some(InputId::RightStick)
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        assert_eq!(
            ModifierPriority::new(vec![InputId::A, InputId::B, InputId::A]),
            Err(MappingError::DuplicateModifier(InputId::A))
        );
    }
}
