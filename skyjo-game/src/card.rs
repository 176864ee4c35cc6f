//! Cards and the three-card columns they are dealt into.

use serde::{Deserialize, Serialize};

use crate::constants::COLUMN_ROWS;

/// Face value of a card, always within `-2..=12`.
pub type CardValue = i8;

/// A single card on a player's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub value: CardValue,
    pub revealed: bool,
}

impl Card {
    #[must_use]
    pub const fn hidden(value: CardValue) -> Self {
        Self {
            value,
            revealed: false,
        }
    }

    #[must_use]
    pub const fn revealed(value: CardValue) -> Self {
        Self {
            value,
            revealed: true,
        }
    }

    /// Value as seen by other players: `None` while face down.
    #[must_use]
    pub const fn visible_value(&self) -> Option<CardValue> {
        if self.revealed {
            Some(self.value)
        } else {
            None
        }
    }
}

/// A vertical group of exactly three cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    cards: [Card; COLUMN_ROWS],
}

impl Column {
    #[must_use]
    pub const fn new(cards: [Card; COLUMN_ROWS]) -> Self {
        Self { cards }
    }

    /// Deal three face-down cards, top row first.
    #[must_use]
    pub const fn from_values(values: [CardValue; COLUMN_ROWS]) -> Self {
        Self {
            cards: [
                Card::hidden(values[0]),
                Card::hidden(values[1]),
                Card::hidden(values[2]),
            ],
        }
    }

    #[must_use]
    pub const fn cards(&self) -> &[Card; COLUMN_ROWS] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, row: usize) -> Option<&Card> {
        self.cards.get(row)
    }

    pub fn reveal(&mut self, row: usize) -> bool {
        match self.cards.get_mut(row) {
            Some(card) => {
                card.revealed = true;
                true
            }
            None => false,
        }
    }

    pub fn reveal_all(&mut self) {
        for card in &mut self.cards {
            card.revealed = true;
        }
    }

    /// Put `value` face up at `row`, handing back the value it covered.
    pub fn replace(&mut self, row: usize, value: CardValue) -> Option<CardValue> {
        let card = self.cards.get_mut(row)?;
        let previous = card.value;
        *card = Card::revealed(value);
        Some(previous)
    }

    /// All three cards are face up and share one value.
    #[must_use]
    pub fn is_removable(&self) -> bool {
        let first = self.cards[0];
        self.cards
            .iter()
            .all(|card| card.revealed && card.value == first.value)
    }

    #[must_use]
    pub fn all_revealed(&self) -> bool {
        self.cards.iter().all(|card| card.revealed)
    }

    /// Sum of the face-up cards; hidden cards count as zero.
    #[must_use]
    pub fn current_score(&self) -> i32 {
        self.cards
            .iter()
            .filter(|card| card.revealed)
            .map(|card| i32::from(card.value))
            .sum()
    }

    #[must_use]
    pub fn visible_values(&self) -> [Option<CardValue>; COLUMN_ROWS] {
        self.cards.map(|card| card.visible_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_returns_covered_value_and_reveals() {
        let mut column = Column::from_values([3, 5, -1]);
        assert_eq!(column.replace(1, 9), Some(5));
        assert_eq!(column.card(1), Some(&Card::revealed(9)));
        assert_eq!(column.replace(3, 1), None);
    }

    #[test]
    fn zero_triples_are_removable() {
        let column = Column::new([Card::revealed(0); COLUMN_ROWS]);
        assert!(column.is_removable());
    }

    #[test]
    fn hidden_top_card_blocks_removal() {
        let column = Column::new([Card::hidden(4), Card::revealed(4), Card::revealed(4)]);
        assert!(!column.is_removable());
    }

    #[test]
    fn mixed_values_block_removal() {
        let column = Column::new([Card::revealed(4), Card::revealed(4), Card::revealed(5)]);
        assert!(!column.is_removable());
    }

    #[test]
    fn score_ignores_hidden_cards() {
        let column = Column::new([Card::revealed(7), Card::hidden(12), Card::revealed(-2)]);
        assert_eq!(column.current_score(), 5);
        assert_eq!(column.visible_values(), [Some(7), None, Some(-2)]);
    }
}
