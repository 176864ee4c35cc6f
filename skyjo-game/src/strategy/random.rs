use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::card::CardValue;
use crate::constants::{COLUMN_ROWS, GRID_COLUMNS, INITIAL_FLIPS};
use crate::grid::Position;
use crate::state::{DrawLocation, Move, TableView};

use super::Strategy;
use super::local_optimum::DEFAULT_INITIAL_FLIPS;

/// Baseline player that makes every decision uniformly at random.
///
/// Targets are drawn over the grid's current shape, so a "reveal" may land
/// on a card that is already face up; that is a legal no-op reveal.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: ChaCha20Rng,
}

impl RandomStrategy {
    #[must_use]
    pub const fn new(rng: ChaCha20Rng) -> Self {
        Self { rng }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn initial_flip_positions(&mut self) -> [Position; 2] {
        let all: Vec<Position> = (0..GRID_COLUMNS)
            .flat_map(|column| (0..COLUMN_ROWS).map(move |row| Position::new(column, row)))
            .collect();
        let picked: Vec<Position> = all
            .choose_multiple(&mut self.rng, INITIAL_FLIPS)
            .copied()
            .collect();
        match picked.as_slice() {
            [first, second] => [*first, *second],
            _ => DEFAULT_INITIAL_FLIPS,
        }
    }

    fn choose_draw_location(&mut self, _view: &TableView) -> DrawLocation {
        if self.rng.gen_bool(0.5) {
            DrawLocation::DrawStack
        } else {
            DrawLocation::DiscardStack
        }
    }

    fn choose_target_location(&mut self, view: &TableView, _drawn: CardValue) -> Move {
        let columns = view.own_grid().len().max(1);
        let target = Position::new(
            self.rng.gen_range(0..columns),
            self.rng.gen_range(0..COLUMN_ROWS),
        );
        Move {
            target,
            replace: self.rng.gen_bool(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn view_with_columns(columns: usize) -> TableView {
        TableView {
            player: "p".to_string(),
            grids: vec![("p".to_string(), vec![[None; 3]; columns])],
            discard_stack: vec![0],
        }
    }

    #[test]
    fn initial_flips_are_distinct_and_in_bounds() {
        for seed in 0..200 {
            let mut strategy = RandomStrategy::new(ChaCha20Rng::seed_from_u64(seed));
            let [a, b] = strategy.initial_flip_positions();
            assert_ne!(a, b);
            for p in [a, b] {
                assert!(p.column < GRID_COLUMNS && p.row < COLUMN_ROWS);
            }
        }
    }

    #[test]
    fn targets_follow_the_shrunken_grid() {
        let mut strategy = RandomStrategy::new(ChaCha20Rng::seed_from_u64(5));
        let view = view_with_columns(2);
        for _ in 0..500 {
            let mv = strategy.choose_target_location(&view, 3);
            assert!(mv.target.column < 2);
            assert!(mv.target.row < COLUMN_ROWS);
        }
    }

    #[test]
    fn both_piles_get_chosen() {
        let mut strategy = RandomStrategy::new(ChaCha20Rng::seed_from_u64(11));
        let view = view_with_columns(4);
        let picks: Vec<DrawLocation> = (0..64)
            .map(|_| strategy.choose_draw_location(&view))
            .collect();
        assert!(picks.contains(&DrawLocation::DrawStack));
        assert!(picks.contains(&DrawLocation::DiscardStack));
    }
}
