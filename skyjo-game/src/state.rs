//! Table state for a single game: both stacks plus every player's grid.

use std::collections::BTreeMap;
use std::fmt;

use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::CardValue;
use crate::constants::{CARDS_PER_GRID, COLUMN_ROWS};
use crate::deck;
use crate::error::GameError;
use crate::grid::{ColumnView, Grid, GridView, Position};

/// Pile a player draws from at the start of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawLocation {
    DrawStack,
    DiscardStack,
}

impl fmt::Display for DrawLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DrawStack => f.write_str("draw stack"),
            Self::DiscardStack => f.write_str("discard stack"),
        }
    }
}

/// What to do with the drawn card.
///
/// With `replace` set, the drawn card takes the target's place face up and the
/// displaced value is discarded. Otherwise the drawn card is discarded and the
/// target card is turned face up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub target: Position,
    pub replace: bool,
}

impl Move {
    #[must_use]
    pub const fn replace(column: usize, row: usize) -> Self {
        Self {
            target: Position::new(column, row),
            replace: true,
        }
    }

    #[must_use]
    pub const fn reveal(column: usize, row: usize) -> Self {
        Self {
            target: Position::new(column, row),
            replace: false,
        }
    }
}

/// Read-only snapshot handed to strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    /// Name of the player the snapshot was taken for.
    pub player: String,
    /// Every grid in seating order.
    pub grids: Vec<(String, GridView)>,
    pub discard_stack: Vec<CardValue>,
}

impl TableView {
    /// Grid of the player being asked for a decision.
    #[must_use]
    pub fn own_grid(&self) -> &[ColumnView] {
        self.grid_of(&self.player).unwrap_or(&[])
    }

    #[must_use]
    pub fn grid_of(&self, player: &str) -> Option<&[ColumnView]> {
        self.grids
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, grid)| grid.as_slice())
    }

    #[must_use]
    pub fn discard_top(&self) -> Option<CardValue> {
        self.discard_stack.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) draw_stack: Vec<CardValue>,
    pub(crate) discard_stack: Vec<CardValue>,
    players: Vec<(String, Grid)>,
}

impl GameState {
    #[must_use]
    pub const fn new(draw_stack: Vec<CardValue>) -> Self {
        Self {
            draw_stack,
            discard_stack: Vec::new(),
            players: Vec::new(),
        }
    }

    /// Assemble a state from explicit parts; mostly useful for fixtures.
    #[must_use]
    pub fn from_parts(
        draw_stack: Vec<CardValue>,
        discard_stack: Vec<CardValue>,
        players: Vec<(String, Grid)>,
    ) -> Self {
        Self {
            draw_stack,
            discard_stack,
            players,
        }
    }

    #[must_use]
    pub fn draw_stack(&self) -> &[CardValue] {
        &self.draw_stack
    }

    #[must_use]
    pub fn discard_stack(&self) -> &[CardValue] {
        &self.discard_stack
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn grid(&self, player: &str) -> Option<&Grid> {
        self.players
            .iter()
            .find(|(name, _)| name == player)
            .map(|(_, grid)| grid)
    }

    fn grid_mut(&mut self, player: &str) -> Result<&mut Grid, GameError> {
        self.players
            .iter_mut()
            .find(|(name, _)| name == player)
            .map(|(_, grid)| grid)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))
    }

    /// Draw twelve cards from the top of the draw stack and seat a new player.
    ///
    /// # Errors
    ///
    /// Fails when the name is already seated or the draw stack runs short.
    pub fn deal_grid(&mut self, player: &str) -> Result<&Grid, GameError> {
        if self.grid(player).is_some() {
            return Err(GameError::DuplicatePlayer(player.to_string()));
        }
        let drawn = deck::draw_cards(&mut self.draw_stack, CARDS_PER_GRID)?;
        let values: [CardValue; CARDS_PER_GRID] =
            drawn.try_into().map_err(|_| GameError::NotEnoughCards {
                requested: CARDS_PER_GRID,
                available: 0,
            })?;
        self.players.push((player.to_string(), Grid::deal(&values)));
        Ok(&self.players[self.players.len() - 1].1)
    }

    /// Move the top draw card onto the (empty) discard stack.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyPile`] when the draw stack is empty.
    pub fn initialize_discard_stack(&mut self) -> Result<(), GameError> {
        let top = self
            .draw_stack
            .pop()
            .ok_or(GameError::EmptyPile(DrawLocation::DrawStack))?;
        self.discard_stack.push(top);
        Ok(())
    }

    /// Card that would be drawn from `location`, without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyPile`] when that pile has no cards.
    pub fn peek(&self, location: DrawLocation) -> Result<CardValue, GameError> {
        let pile = match location {
            DrawLocation::DrawStack => &self.draw_stack,
            DrawLocation::DiscardStack => &self.discard_stack,
        };
        pile.last().copied().ok_or(GameError::EmptyPile(location))
    }

    /// Draw from `location` and resolve `mv` on `player`'s grid.
    ///
    /// # Errors
    ///
    /// Fails for unknown players, empty piles and targets outside the grid.
    /// The state is left untouched on error.
    pub fn apply_move(
        &mut self,
        player: &str,
        location: DrawLocation,
        mv: Move,
    ) -> Result<(), GameError> {
        self.peek(location)?;
        {
            let grid = self
                .grid(player)
                .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))?;
            if mv.target.column >= grid.column_count() || mv.target.row >= COLUMN_ROWS {
                return Err(GameError::OutOfBounds {
                    position: mv.target,
                    columns: grid.column_count(),
                });
            }
        }

        let drawn = match location {
            DrawLocation::DrawStack => self.draw_stack.pop(),
            DrawLocation::DiscardStack => self.discard_stack.pop(),
        }
        .ok_or(GameError::EmptyPile(location))?;

        let grid = self.grid_mut(player)?;
        if mv.replace {
            let displaced = grid.replace_card(mv.target, drawn)?;
            trace!(
                "{player} drew {drawn} from the {location}, placed it at {} and discarded {displaced}",
                mv.target
            );
            self.discard_stack.push(displaced);
        } else {
            grid.reveal_card(mv.target)?;
            trace!(
                "{player} drew {drawn} from the {location}, discarded it and revealed {}",
                mv.target
            );
            self.discard_stack.push(drawn);
        }
        Ok(())
    }

    /// Turn up the given cards on `player`'s grid.
    ///
    /// # Errors
    ///
    /// Fails for unknown players or positions outside the grid.
    pub fn flip_cards(&mut self, player: &str, positions: &[Position]) -> Result<(), GameError> {
        let grid = self.grid_mut(player)?;
        for &position in positions {
            grid.reveal_card(position)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GameError::UnknownPlayer`] for names not at the table.
    pub fn remove_columns_with_identical_cards(
        &mut self,
        player: &str,
    ) -> Result<usize, GameError> {
        Ok(self.grid_mut(player)?.remove_matching_columns())
    }

    /// # Errors
    ///
    /// Returns [`GameError::UnknownPlayer`] for names not at the table.
    pub fn player_has_finished(&self, player: &str) -> Result<bool, GameError> {
        self.grid(player)
            .map(Grid::all_revealed)
            .ok_or_else(|| GameError::UnknownPlayer(player.to_string()))
    }

    pub fn reveal_all_cards(&mut self) {
        for (_, grid) in &mut self.players {
            grid.reveal_all();
        }
    }

    /// Revealed-only score of every player.
    #[must_use]
    pub fn calculate_scores(&self) -> BTreeMap<String, i32> {
        self.players
            .iter()
            .map(|(name, grid)| (name.clone(), grid.current_score()))
            .collect()
    }

    /// Revealed-only scores in seating order.
    #[must_use]
    pub fn seated_scores(&self) -> Vec<(String, i32)> {
        self.players
            .iter()
            .map(|(name, grid)| (name.clone(), grid.current_score()))
            .collect()
    }

    /// Refill the draw stack from the discard stack once it runs dry.
    /// Returns whether a reshuffle happened.
    pub fn reshuffle_if_exhausted<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.draw_stack.is_empty() {
            return false;
        }
        deck::reshuffle(&mut self.draw_stack, &mut self.discard_stack, rng);
        true
    }

    /// Immutable snapshot of the table from `player`'s seat.
    #[must_use]
    pub fn snapshot(&self, player: &str) -> TableView {
        TableView {
            player: player.to_string(),
            grids: self
                .players
                .iter()
                .map(|(name, grid)| (name.clone(), grid.view()))
                .collect(),
            discard_stack: self.discard_stack.clone(),
        }
    }
}
