//! Fatal conditions raised while setting up or playing a game.

use thiserror::Error;

use crate::engine::GamePhase;
use crate::grid::Position;
use crate::state::DrawLocation;

/// Errors that abort the game in progress.
///
/// Every variant is a broken precondition: a strategy returned a move the
/// rules do not allow, or the engine was driven out of order. None of them
/// are recoverable mid-game.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("roster must hold between 1 and {max} players (got {count})")]
    RosterSize { count: usize, max: usize },
    #[error("player name '{0}' appears more than once in the roster")]
    DuplicatePlayer(String),
    #[error("unknown player '{0}'")]
    UnknownPlayer(String),
    #[error("position {position} is outside a grid of {columns} columns")]
    OutOfBounds { position: Position, columns: usize },
    #[error("initial flips for '{player}' must be two distinct positions (got {first} and {second})")]
    InvalidInitialFlips {
        player: String,
        first: Position,
        second: Position,
    },
    #[error("cannot draw {requested} cards, only {available} left in the draw stack")]
    NotEnoughCards { requested: usize, available: usize },
    #[error("cannot draw from the {0}: it is empty")]
    EmptyPile(DrawLocation),
    #[error("operation requires phase {expected:?} but the game is in {actual:?}")]
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("game did not finish within {0} turns")]
    TurnLimitExceeded(u32),
}
