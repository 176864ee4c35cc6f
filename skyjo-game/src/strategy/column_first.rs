use crate::card::CardValue;
use crate::grid::{ColumnView, Position};
use crate::state::{DrawLocation, Move, TableView};
use crate::stats::CardStatistic;

use super::local_optimum::{DEFAULT_INITIAL_FLIPS, greedy_move};
use super::{Strategy, expectation_or_deck_mean};

/// A revealed value stops being worth chasing once this many copies are out.
const MAX_OBSERVED_FOR_CHASE: u32 = 5;

/// Builds columns of identical cards when it can, otherwise plays greedily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnFirstStrategy;

impl Strategy for ColumnFirstStrategy {
    fn name(&self) -> &'static str {
        "Column First"
    }

    fn initial_flip_positions(&mut self) -> [Position; 2] {
        DEFAULT_INITIAL_FLIPS
    }

    fn choose_draw_location(&mut self, view: &TableView) -> DrawLocation {
        let Some(top) = view.discard_top() else {
            return DrawLocation::DrawStack;
        };
        if top <= 0 {
            return DrawLocation::DiscardStack;
        }
        let matches_own = view
            .own_grid()
            .iter()
            .any(|column| column.contains(&Some(top)));
        if matches_own && CardStatistic::observe(view).count(top) <= MAX_OBSERVED_FOR_CHASE {
            return DrawLocation::DiscardStack;
        }
        if f64::from(top) < expectation_or_deck_mean(view, None) {
            DrawLocation::DiscardStack
        } else {
            DrawLocation::DrawStack
        }
    }

    fn choose_target_location(&mut self, view: &TableView, drawn: CardValue) -> Move {
        let grid = view.own_grid();
        let expected = expectation_or_deck_mean(view, Some(drawn));
        column_move(grid, expected, drawn).unwrap_or_else(|| greedy_move(grid, expected, drawn))
    }
}

/// Place `drawn` into the column already holding the most revealed copies of
/// it. Only hidden slots and revealed cards worth more than `drawn` qualify.
fn column_move(grid: &[ColumnView], expected: f64, drawn: CardValue) -> Option<Move> {
    let mut best_column: Option<(usize, usize)> = None;
    for (index, column) in grid.iter().enumerate() {
        let matches = column.iter().filter(|slot| **slot == Some(drawn)).count();
        if matches > 0 && best_column.is_none_or(|(_, most)| matches > most) {
            best_column = Some((index, matches));
        }
    }
    let (column_index, _) = best_column?;

    let drawn_f = f64::from(drawn);
    let mut target: Option<(usize, f64)> = None;
    for (row, slot) in grid[column_index].iter().enumerate() {
        let gain = match slot {
            None => expected - drawn_f,
            Some(face) if *face > drawn => f64::from(*face) - drawn_f,
            Some(_) => continue,
        };
        if target.is_none_or(|(_, best)| gain > best) {
            target = Some((row, gain));
        }
    }
    target.map(|(row, _)| Move::replace(column_index, row))
}
