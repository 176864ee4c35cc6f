use crate::card::CardValue;
use crate::constants::INITIAL_FLIPS;
use crate::grid::{ColumnView, Position};
use crate::state::{DrawLocation, Move, TableView};

use super::{Strategy, expectation_or_deck_mean};

/// Fixed opening flips shared by the deterministic strategies.
pub(crate) const DEFAULT_INITIAL_FLIPS: [Position; INITIAL_FLIPS] =
    [Position::new(1, 1), Position::new(2, 1)];

/// Greedy player: always takes the single best one-card improvement.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOptimumStrategy;

impl Strategy for LocalOptimumStrategy {
    fn name(&self) -> &'static str {
        "Local Optimum"
    }

    fn initial_flip_positions(&mut self) -> [Position; 2] {
        DEFAULT_INITIAL_FLIPS
    }

    fn choose_draw_location(&mut self, view: &TableView) -> DrawLocation {
        let expected = expectation_or_deck_mean(view, None);
        match view.discard_top() {
            Some(top) if f64::from(top) < expected => DrawLocation::DiscardStack,
            _ => DrawLocation::DrawStack,
        }
    }

    fn choose_target_location(&mut self, view: &TableView, drawn: CardValue) -> Move {
        let expected = expectation_or_deck_mean(view, Some(drawn));
        greedy_move(view.own_grid(), expected, drawn)
    }
}

/// Score every slot as `current - drawn` (hidden slots use `expected`) and
/// replace the first strictly-best one if that gains anything. Otherwise
/// discard the drawn card and turn up the last hidden slot.
pub(crate) fn greedy_move(grid: &[ColumnView], expected: f64, drawn: CardValue) -> Move {
    let drawn = f64::from(drawn);
    let mut best: Option<(Position, f64)> = None;
    let mut last_hidden: Option<Position> = None;

    for (column_index, column) in grid.iter().enumerate() {
        for (row_index, slot) in column.iter().enumerate() {
            let position = Position::new(column_index, row_index);
            let gain = match slot {
                Some(face) => f64::from(*face) - drawn,
                None => {
                    last_hidden = Some(position);
                    expected - drawn
                }
            };
            if best.is_none_or(|(_, best_gain)| gain > best_gain) {
                best = Some((position, gain));
            }
        }
    }

    match (best, last_hidden) {
        (Some((target, gain)), _) if gain > 0.0 => Move {
            target,
            replace: true,
        },
        (_, Some(target)) => Move {
            target,
            replace: false,
        },
        // Nothing hidden and nothing improves: the swap is still a legal move.
        (Some((target, _)), None) => Move {
            target,
            replace: true,
        },
        (None, None) => Move::reveal(0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(own: Vec<ColumnView>, discard: Vec<CardValue>) -> TableView {
        TableView {
            player: "me".to_string(),
            grids: vec![
                ("me".to_string(), own),
                ("other".to_string(), vec![[None; 3]; 4]),
            ],
            discard_stack: discard,
        }
    }

    #[test]
    fn takes_a_low_discard() {
        let view = table(vec![[None; 3]; 4], vec![-1]);
        assert_eq!(
            LocalOptimumStrategy.choose_draw_location(&view),
            DrawLocation::DiscardStack
        );
        let view = table(vec![[None; 3]; 4], vec![9]);
        assert_eq!(
            LocalOptimumStrategy.choose_draw_location(&view),
            DrawLocation::DrawStack
        );
    }

    #[test]
    fn replaces_the_highest_revealed_card() {
        let own = vec![
            [Some(3), None, None],
            [None, Some(11), None],
            [None, Some(2), None],
            [None, None, None],
        ];
        let mv = LocalOptimumStrategy.choose_target_location(&table(own, vec![4]), 1);
        assert_eq!(mv, Move::replace(1, 1));
    }

    #[test]
    fn low_card_goes_on_a_hidden_slot_when_that_is_best() {
        let own = vec![[Some(-1), None, None], [None, None, None]];
        let mv = LocalOptimumStrategy.choose_target_location(&table(own, vec![4]), -2);
        // Hidden slots gain ~7 against a revealed -1 gaining 1; first hidden wins ties.
        assert_eq!(mv, Move::replace(0, 1));
    }

    #[test]
    fn high_card_is_discarded_and_last_hidden_revealed() {
        let own = vec![
            [Some(0), None, Some(1)],
            [Some(2), Some(2), None],
            [Some(-1), Some(0), Some(0)],
        ];
        let mv = greedy_move(&own, 5.0, 12);
        assert_eq!(mv, Move::reveal(1, 2));
    }

    #[test]
    fn fully_revealed_grid_still_yields_a_swap() {
        let own = vec![[Some(0), Some(1), Some(-2)]];
        assert_eq!(greedy_move(&own, 5.0, 12), Move::replace(0, 1));
    }

    #[test]
    fn opening_flips_are_fixed() {
        assert_eq!(
            LocalOptimumStrategy.initial_flip_positions(),
            [Position::new(1, 1), Position::new(2, 1)]
        );
    }
}
