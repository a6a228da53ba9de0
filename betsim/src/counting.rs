//! Hi-Lo card counting.

use crate::simulation::Card;

/// Floor for the decks-remaining divisor so the true count stays bounded
/// as the shoe nears exhaustion.
const MIN_DECKS_REMAINING: f64 = 0.1;

/// Hi-Lo weight of a dealt card: 2-6 count +1, 7-9 count 0, ten-value
/// cards and aces count -1.
pub fn hi_lo_weight(card: Card) -> i64 {
    match card.blackjack_value() {
        2..=6 => 1,
        7..=9 => 0,
        _ => -1,
    }
}

/// Running Hi-Lo count over the cards dealt from the current shoe.
#[derive(Debug, Clone, Copy)]
pub struct HiLoCounter {
    enabled: bool,
    running_count: i64,
}

impl HiLoCounter {
    pub fn new(enabled: bool) -> Self {
        HiLoCounter {
            enabled,
            running_count: 0,
        }
    }

    /// Feeds one dealt card into the count. Counting each card exactly
    /// once, in deal order, is the caller's contract.
    pub fn observe(&mut self, card: Card) {
        if self.enabled {
            self.running_count += hi_lo_weight(card);
        }
    }

    /// Starts over for a fresh shoe.
    pub fn reset(&mut self) {
        self.running_count = 0;
    }

    pub fn running_count(&self) -> i64 {
        self.running_count
    }

    /// Running count normalized by decks left in the shoe.
    pub fn true_count(&self, cards_remaining: usize) -> f64 {
        let decks_remaining = (cards_remaining as f64 / 52.0).max(MIN_DECKS_REMAINING);
        self.running_count as f64 / decks_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Suit;

    fn card(face_value: u8) -> Card {
        Card {
            face_value,
            suit: Suit::Heart,
        }
    }

    #[test]
    fn hi_lo_weights_per_rank() {
        assert_eq!(hi_lo_weight(card(1)), -1); // ace
        for face_value in 2..=6 {
            assert_eq!(hi_lo_weight(card(face_value)), 1);
        }
        for face_value in 7..=9 {
            assert_eq!(hi_lo_weight(card(face_value)), 0);
        }
        for face_value in 10..=13 {
            assert_eq!(hi_lo_weight(card(face_value)), -1);
        }
    }

    #[test]
    fn counter_accumulates_in_deal_order() {
        let mut counter = HiLoCounter::new(true);
        counter.observe(card(2));
        counter.observe(card(5));
        counter.observe(card(8));
        counter.observe(card(13));
        assert_eq!(counter.running_count(), 1);
        counter.reset();
        assert_eq!(counter.running_count(), 0);
    }

    #[test]
    fn disabled_counter_stays_at_zero() {
        let mut counter = HiLoCounter::new(false);
        counter.observe(card(2));
        counter.observe(card(3));
        assert_eq!(counter.running_count(), 0);
    }

    #[test]
    fn true_count_normalizes_by_decks_remaining() {
        let mut counter = HiLoCounter::new(true);
        for _ in 0..6 {
            counter.observe(card(2));
        }
        // Three decks left in the shoe.
        assert_eq!(counter.true_count(156), 2.0);
    }

    #[test]
    fn true_count_divisor_is_floored_near_exhaustion() {
        let mut counter = HiLoCounter::new(true);
        counter.observe(card(4));
        assert_eq!(counter.true_count(0), 10.0);
    }
}
