//! Card counting over publicly visible information.

use crate::card::CardValue;
use crate::constants::{CARD_FREQUENCIES, MAX_CARD_VALUE, MIN_CARD_VALUE};
use crate::state::TableView;

const VALUE_SLOTS: usize = (MAX_CARD_VALUE - MIN_CARD_VALUE + 1) as usize;

/// How many cards of each value are currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardStatistic {
    counts: [u32; VALUE_SLOTS],
}

impl CardStatistic {
    /// Count every revealed grid card plus the whole discard stack.
    #[must_use]
    pub fn observe(view: &TableView) -> Self {
        let mut stats = Self::default();
        stats.add_all(view.discard_stack.iter().copied());
        for (_, grid) in &view.grids {
            for column in grid {
                stats.add_all(column.iter().flatten().copied());
            }
        }
        stats
    }

    fn slot(value: CardValue) -> Option<usize> {
        usize::try_from(i16::from(value) - i16::from(MIN_CARD_VALUE))
            .ok()
            .filter(|&slot| slot < VALUE_SLOTS)
    }

    pub fn add(&mut self, value: CardValue) {
        if let Some(slot) = Self::slot(value) {
            self.counts[slot] += 1;
        }
    }

    pub fn add_all(&mut self, values: impl IntoIterator<Item = CardValue>) {
        for value in values {
            self.add(value);
        }
    }

    #[must_use]
    pub fn count(&self, value: CardValue) -> u32 {
        Self::slot(value).map_or(0, |slot| self.counts[slot])
    }

    /// Cards of each value not yet seen, clamped at zero.
    pub fn remaining(&self) -> impl Iterator<Item = (CardValue, u32)> + '_ {
        CARD_FREQUENCIES
            .iter()
            .map(|&(value, total)| (value, total.saturating_sub(self.count(value))))
    }

    /// Mean value of the cards not yet seen.
    ///
    /// Returns `None` once every card of the deck has been observed.
    #[must_use]
    pub fn expected_hidden_value(&self) -> Option<f64> {
        let (sum, count) = self
            .remaining()
            .fold((0_i64, 0_u32), |(sum, count), (value, left)| {
                (sum + i64::from(value) * i64::from(left), count + left)
            });
        if count == 0 {
            return None;
        }
        Some(crate::numbers::i64_to_f64(sum) / f64::from(count))
    }
}

/// Expected value of a hidden card given everything visible in `view`,
/// optionally counting an extra card already known to the caller.
#[must_use]
pub fn expected_hidden_value(view: &TableView, also_seen: Option<CardValue>) -> Option<f64> {
    let mut stats = CardStatistic::observe(view);
    stats.add_all(also_seen);
    stats.expected_hidden_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DECK_MEAN;

    fn view(discard: Vec<CardValue>, grid: Vec<[Option<CardValue>; 3]>) -> TableView {
        TableView {
            player: "player1".to_string(),
            grids: vec![("player1".to_string(), grid)],
            discard_stack: discard,
        }
    }

    #[test]
    fn empty_table_expects_deck_mean() {
        let v = view(Vec::new(), vec![[None; 3]; 4]);
        let expected = expected_hidden_value(&v, None).unwrap();
        assert!((expected - DECK_MEAN).abs() < 1e-12);
        assert!((expected - 755.0 / 155.0).abs() < 1e-12);
    }

    #[test]
    fn visible_cards_shift_the_expectation() {
        // Seeing every -2 and -1 raises the mean of what is left.
        let mut discard = vec![-2; 5];
        discard.extend(vec![-1; 15]);
        let v = view(discard, vec![[None; 3]; 4]);
        let expected = expected_hidden_value(&v, None).unwrap();
        // 755 - (-10 - 15) spread over the 155 - 20 cards still unseen.
        assert!((expected - 780.0 / 135.0).abs() < 1e-12);
    }

    #[test]
    fn grid_cards_and_extra_card_are_counted() {
        let v = view(vec![12], vec![[Some(12), None, Some(0)]]);
        let stats = CardStatistic::observe(&v);
        assert_eq!(stats.count(12), 2);
        assert_eq!(stats.count(0), 1);
        assert_eq!(stats.count(5), 0);

        let with_extra = expected_hidden_value(&v, Some(12)).unwrap();
        let without = expected_hidden_value(&v, None).unwrap();
        assert!(with_extra < without);
    }

    #[test]
    fn fully_observed_deck_has_no_expectation() {
        let mut discard = Vec::new();
        for &(value, count) in &CARD_FREQUENCIES {
            discard.extend(std::iter::repeat_n(value, count as usize));
        }
        let v = view(discard, Vec::new());
        assert_eq!(expected_hidden_value(&v, None), None);
    }

    #[test]
    fn out_of_range_values_are_ignored() {
        let mut stats = CardStatistic::default();
        stats.add(42);
        stats.add(-7);
        assert_eq!(stats, CardStatistic::default());
    }
}
