//! One-line cheat sheet for the current stick position and layer

use super::action::Binding;
use super::input::InputId;
use super::quadrant::StickQuadrants;
use super::table::ActionTable;

/// Lists what every stick-consulting input would write right now, e.g.
/// `LB: k  RB: |  RT: .  LT: q`. Inputs without a text binding are left out.
pub fn layer_hint(table: &ActionTable, sticks: StickQuadrants, modifier: Option<InputId>) -> String {
    table
        .stick_inputs()
        .into_iter()
        .filter_map(|input| {
            let aim = table.stick_policy(input).aim(sticks);
            match table.resolve(input, aim, modifier) {
                Some(Binding::Write(text)) => Some(format!("{}: {}", input.label(), text)),
                _ => None,
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::quadrant::Quadrant;
    use crate::mapping::table::FN2;

    #[test]
    fn right_stick_up_hint() {
        let sticks = StickQuadrants {
            left: Quadrant::Neutral,
            right: Quadrant::Up,
        };
        assert_eq!(
            layer_hint(&ActionTable::default_layout(), sticks, None),
            "LB: k  RB: |  RT: .  LT: q"
        );
    }

    #[test]
    fn empty_cells_are_skipped() {
        let sticks = StickQuadrants {
            left: Quadrant::Neutral,
            right: Quadrant::Right,
        };
        assert_eq!(
            layer_hint(&ActionTable::default_layout(), sticks, Some(FN2)),
            "LB: 3  LT: /"
        );
    }
}
