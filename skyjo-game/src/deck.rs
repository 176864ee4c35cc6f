//! Deck generation, drawing and reshuffling.
//!
//! Stacks are plain `Vec<CardValue>` with the top card at the end.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::CardValue;
use crate::constants::{CARD_FREQUENCIES, DECK_SIZE};
use crate::error::GameError;

/// Build the full 155-card pool in uniformly random order.
#[must_use]
pub fn generate_draw_stack<R: Rng + ?Sized>(rng: &mut R) -> Vec<CardValue> {
    let mut stack = Vec::with_capacity(DECK_SIZE);
    for &(value, count) in &CARD_FREQUENCIES {
        stack.extend(std::iter::repeat_n(value, count as usize));
    }
    stack.shuffle(rng);
    stack
}

/// Remove the top `n` cards, returned in stack order (last element was the top).
///
/// # Errors
///
/// Returns [`GameError::NotEnoughCards`] when fewer than `n` cards remain.
pub fn draw_cards(stack: &mut Vec<CardValue>, n: usize) -> Result<Vec<CardValue>, GameError> {
    if n > stack.len() {
        return Err(GameError::NotEnoughCards {
            requested: n,
            available: stack.len(),
        });
    }
    let split = stack.len() - n;
    Ok(stack.split_off(split))
}

/// Fold the discard stack back into the draw stack, shuffle everything and
/// seed a fresh single-card discard stack from the new top.
pub fn reshuffle<R: Rng + ?Sized>(
    draw: &mut Vec<CardValue>,
    discard: &mut Vec<CardValue>,
    rng: &mut R,
) {
    draw.append(discard);
    draw.shuffle(rng);
    if let Some(top) = draw.pop() {
        discard.push(top);
    }
}
