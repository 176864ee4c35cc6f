//! Fixed rules and tuning constants for the Skyjo engine.

use crate::card::CardValue;

// Deck composition ---------------------------------------------------------
/// Value/frequency table for a full deck. Ordered by ascending value.
pub const CARD_FREQUENCIES: [(CardValue, u32); 15] = [
    (-2, 5),
    (-1, 15),
    (0, 15),
    (1, 10),
    (2, 10),
    (3, 10),
    (4, 10),
    (5, 10),
    (6, 10),
    (7, 10),
    (8, 10),
    (9, 10),
    (10, 10),
    (11, 10),
    (12, 10),
];

pub const MIN_CARD_VALUE: CardValue = -2;
pub const MAX_CARD_VALUE: CardValue = 12;

/// Cards in a full deck, the sum of the frequency table (155).
pub const DECK_SIZE: usize = deck_size();

/// Sum of every card value in a full deck (755).
pub const DECK_VALUE_SUM: i64 = deck_value_sum();

/// Mean value of the full deck (755 / 155).
#[allow(clippy::cast_precision_loss)]
pub const DECK_MEAN: f64 = DECK_VALUE_SUM as f64 / DECK_SIZE as f64;

// Grid shape ---------------------------------------------------------------
pub const GRID_COLUMNS: usize = 4;
pub const COLUMN_ROWS: usize = 3;
pub const CARDS_PER_GRID: usize = GRID_COLUMNS * COLUMN_ROWS;
pub const INITIAL_FLIPS: usize = 2;

/// Every player needs a full grid and one card must seed the discard stack.
pub const MAX_PLAYERS: usize = (DECK_SIZE - 1) / CARDS_PER_GRID;

// Engine guards ------------------------------------------------------------
pub const DEFAULT_MAX_TURNS: u32 = 10_000;

// Seed stream tags ---------------------------------------------------------
pub(crate) const STREAM_DECK: &[u8] = b"skyjo.deck";
pub(crate) const STREAM_STRATEGY_PREFIX: &str = "skyjo.strategy.";
pub(crate) const STREAM_GAME_PREFIX: &str = "skyjo.game.";

const fn deck_size() -> usize {
    let mut total = 0;
    let mut index = 0;
    while index < CARD_FREQUENCIES.len() {
        total += CARD_FREQUENCIES[index].1 as usize;
        index += 1;
    }
    total
}

const fn deck_value_sum() -> i64 {
    let mut total = 0;
    let mut index = 0;
    while index < CARD_FREQUENCIES.len() {
        let (value, count) = CARD_FREQUENCIES[index];
        total += value as i64 * count as i64;
        index += 1;
    }
    total
}

/// Frequency of `value` in a full deck, 0 for values outside the deck.
#[must_use]
pub fn frequency_of(value: CardValue) -> u32 {
    CARD_FREQUENCIES
        .iter()
        .find(|(v, _)| *v == value)
        .map_or(0, |(_, count)| *count)
}
