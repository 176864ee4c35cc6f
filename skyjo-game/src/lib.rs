//! Skyjo Game Engine
//!
//! Rules, table state and built-in strategies for simulating games of the card
//! game Skyjo. Every game is deterministic for a given seed, so batches of
//! games can be replayed and compared across strategies.

pub mod card;
pub mod constants;
pub mod deck;
pub mod engine;
pub mod error;
pub mod grid;
pub mod numbers;
pub mod seed;
pub mod state;
pub mod stats;
pub mod strategy;

// Re-export commonly used types
pub use card::{Card, CardValue, Column};
pub use engine::{EngineConfig, GameOutcome, GamePhase, SkyjoGame, apply_final_scoring};
pub use error::GameError;
pub use grid::{ColumnView, Grid, GridView, Position};
pub use seed::{deck_rng, derive_stream_seed, game_seed, strategy_rng};
pub use state::{DrawLocation, GameState, Move, TableView};
pub use stats::{CardStatistic, expected_hidden_value};
pub use strategy::{
    ColumnFirstStrategy, LocalOptimumStrategy, RandomStrategy, Strategy, StrategyKind,
    UnknownStrategy,
};
