//! A player's grid: up to four columns of three cards.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::card::{CardValue, Column};
use crate::constants::{CARDS_PER_GRID, COLUMN_ROWS, GRID_COLUMNS};
use crate::error::GameError;

/// Column/row coordinate on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Visible values of one column, top row first. Hidden cards are `None`.
pub type ColumnView = [Option<CardValue>; COLUMN_ROWS];

/// Visible layout of a grid, one entry per surviving column.
pub type GridView = Vec<ColumnView>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: SmallVec<[Column; GRID_COLUMNS]>,
}

impl Grid {
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    /// Build a grid from twelve dealt cards: cards 0-2 form column 0,
    /// 3-5 column 1, and so on.
    #[must_use]
    pub fn deal(values: &[CardValue; CARDS_PER_GRID]) -> Self {
        Self::new(
            values
                .chunks_exact(COLUMN_ROWS)
                .map(|chunk| Column::from_values([chunk[0], chunk[1], chunk[2]])),
        )
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn check_bounds(&self, position: Position) -> Result<(), GameError> {
        if position.column >= self.columns.len() || position.row >= COLUMN_ROWS {
            return Err(GameError::OutOfBounds {
                position,
                columns: self.columns.len(),
            });
        }
        Ok(())
    }

    /// Turn a card face up. Revealing an already face-up card is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] when the position does not exist.
    pub fn reveal_card(&mut self, position: Position) -> Result<(), GameError> {
        self.check_bounds(position)?;
        self.columns[position.column].reveal(position.row);
        Ok(())
    }

    pub fn reveal_all(&mut self) {
        for column in &mut self.columns {
            column.reveal_all();
        }
    }

    /// Place `value` face up at `position` and return the value it displaced.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::OutOfBounds`] when the position does not exist.
    pub fn replace_card(
        &mut self,
        position: Position,
        value: CardValue,
    ) -> Result<CardValue, GameError> {
        self.check_bounds(position)?;
        self.columns[position.column]
            .replace(position.row, value)
            .ok_or(GameError::OutOfBounds {
                position,
                columns: self.columns.len(),
            })
    }

    #[must_use]
    pub fn is_column_removable(&self, column: usize) -> bool {
        self.columns.get(column).is_some_and(Column::is_removable)
    }

    /// Drop every column whose three cards are revealed and equal.
    /// Returns the number of columns removed.
    pub fn remove_matching_columns(&mut self) -> usize {
        let before = self.columns.len();
        self.columns.retain(|column| !column.is_removable());
        before - self.columns.len()
    }

    #[must_use]
    pub fn all_revealed(&self) -> bool {
        self.columns.iter().all(Column::all_revealed)
    }

    #[must_use]
    pub fn current_score(&self) -> i32 {
        self.columns.iter().map(Column::current_score).sum()
    }

    #[must_use]
    pub fn view(&self) -> GridView {
        self.columns.iter().map(Column::visible_values).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    fn dealt() -> Grid {
        Grid::deal(&[9, 12, 0, 10, 7, 8, 5, 5, 6, 5, 3, 8])
    }

    #[test]
    fn deal_partitions_three_per_column() {
        let grid = dealt();
        assert_eq!(grid.column_count(), 4);
        let values: Vec<Vec<CardValue>> = grid
            .columns()
            .iter()
            .map(|c| c.cards().iter().map(|card| card.value).collect())
            .collect();
        assert_eq!(
            values,
            vec![
                vec![9, 12, 0],
                vec![10, 7, 8],
                vec![5, 5, 6],
                vec![5, 3, 8]
            ]
        );
        assert!(grid.columns().iter().flat_map(Column::cards).all(|c| !c.revealed));
    }

    #[test]
    fn reveal_outside_grid_is_rejected() {
        let mut grid = dealt();
        let err = grid.reveal_card(Position::new(4, 0)).unwrap_err();
        assert_eq!(
            err,
            GameError::OutOfBounds {
                position: Position::new(4, 0),
                columns: 4
            }
        );
        assert!(grid.reveal_card(Position::new(0, 3)).is_err());
    }

    #[test]
    fn unrevealed_grid_scores_zero() {
        assert_eq!(dealt().current_score(), 0);
    }

    #[test]
    fn reveal_all_scores_true_values_and_is_idempotent() {
        let mut grid = dealt();
        grid.reveal_all();
        let once = grid.clone();
        grid.reveal_all();
        assert_eq!(grid, once);
        assert!(grid.all_revealed());
        assert_eq!(grid.current_score(), 78);
    }

    #[test]
    fn view_hides_face_down_cards() {
        let mut grid = dealt();
        grid.reveal_card(Position::new(1, 2)).unwrap();
        let view = grid.view();
        assert_eq!(view[1], [None, None, Some(8)]);
        assert_eq!(view[0], [None, None, None]);
    }

    #[test]
    fn removal_shrinks_the_column_sequence() {
        let mut grid = Grid::new([
            Column::new([Card::revealed(5); 3]),
            Column::from_values([7, 4, 2]),
            Column::from_values([2, 2, 2]),
            Column::from_values([8, 4, 1]),
        ]);
        assert!(grid.is_column_removable(0));
        assert!(!grid.is_column_removable(2));
        assert!(!grid.is_column_removable(7));
        assert_eq!(grid.remove_matching_columns(), 1);
        assert_eq!(grid.column_count(), 3);
        assert!(grid.reveal_card(Position::new(2, 2)).is_ok());
        assert!(grid.reveal_card(Position::new(3, 0)).is_err());
        assert_eq!(grid.columns()[0], Column::from_values([7, 4, 2]));
    }

    #[test]
    fn adjacent_removable_columns_are_both_removed() {
        let mut grid = Grid::new([
            Column::new([Card::revealed(1); 3]),
            Column::new([Card::revealed(1); 3]),
            Column::from_values([3, 4, 5]),
        ]);
        assert_eq!(grid.remove_matching_columns(), 2);
        assert_eq!(grid.column_count(), 1);
    }
}
