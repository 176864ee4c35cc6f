//! Decision makers consulted by the engine every turn.
//!
//! Strategies only ever see [`TableView`] snapshots and influence the game
//! through the [`Move`] they return.

use std::fmt;
use std::str::FromStr;

use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::card::CardValue;
use crate::constants::{DECK_MEAN, INITIAL_FLIPS};
use crate::grid::Position;
use crate::state::{DrawLocation, Move, TableView};
use crate::stats::expected_hidden_value;

mod column_first;
mod local_optimum;
mod random;

pub use column_first::ColumnFirstStrategy;
pub use local_optimum::LocalOptimumStrategy;
pub use random::RandomStrategy;

/// Capability set every player strategy provides.
pub trait Strategy {
    /// Label used in logs and reports.
    fn name(&self) -> &'static str;

    /// Two distinct cards to turn up before the first turn.
    fn initial_flip_positions(&mut self) -> [Position; INITIAL_FLIPS];

    /// Pick the pile to draw from.
    fn choose_draw_location(&mut self, view: &TableView) -> DrawLocation;

    /// Decide what to do with `drawn`, which has already been chosen but not
    /// yet taken from its pile.
    fn choose_target_location(&mut self, view: &TableView, drawn: CardValue) -> Move;
}

/// Built-in strategies selectable by key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    #[serde(rename = "random")]
    Random,
    #[serde(rename = "local")]
    LocalOptimum,
    #[serde(rename = "column")]
    ColumnFirst,
}

impl StrategyKind {
    pub const ALL: [Self; 3] = [Self::Random, Self::LocalOptimum, Self::ColumnFirst];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::LocalOptimum => "local",
            Self::ColumnFirst => "column",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::LocalOptimum => "Local Optimum",
            Self::ColumnFirst => "Column First",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Random => "uniformly random draws, targets and flips",
            Self::LocalOptimum => "greedy single-card improvement against the expected hidden value",
            Self::ColumnFirst => "chases matching columns, otherwise plays the local optimum",
        }
    }

    /// Instantiate the strategy. `rng` is only consumed by randomized variants.
    #[must_use]
    pub fn create(self, rng: ChaCha20Rng) -> Box<dyn Strategy + Send> {
        match self {
            Self::Random => Box::new(RandomStrategy::new(rng)),
            Self::LocalOptimum => Box::new(LocalOptimumStrategy),
            Self::ColumnFirst => Box::new(ColumnFirstStrategy),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown strategy '{0}' (expected one of: random, local, column)")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Expected hidden value with the full-deck mean as the fallback once every
/// card has been seen.
pub(crate) fn expectation_or_deck_mean(view: &TableView, also_seen: Option<CardValue>) -> f64 {
    expected_hidden_value(view, also_seen).unwrap_or(DECK_MEAN)
}
