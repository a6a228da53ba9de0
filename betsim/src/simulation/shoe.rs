use super::{Card, Suit};

use strum::IntoEnumIterator;

use rand::seq::SliceRandom;
use rand::Rng;

/// With fewer cards than this left, the shoe is reshuffled regardless of
/// the cut card.
const RESHUFFLE_FLOOR: usize = 10;

/// Represents a shoe in the real world.
#[derive(Debug, Clone)]
pub struct Shoe {
    cut_card_index: usize,
    cards: Vec<Card>,
    current_index: usize,
}

impl Shoe {
    /// Creates a new shoe with ordered cards. `penetration` is the percent
    /// of the shoe dealt before the cut card forces a reshuffle.
    pub fn new(number_of_decks: u8, penetration: f64) -> Shoe {
        let mut cards = Vec::with_capacity(number_of_decks as usize * 52);
        for _ in 0..number_of_decks {
            for suit in Suit::iter() {
                for face_value in 1..=13 {
                    cards.push(Card { face_value, suit });
                }
            }
        }
        let cut_card_index = (cards.len() as f64 * penetration / 100.0) as usize;
        Shoe {
            cut_card_index,
            cards,
            current_index: 0,
        }
    }

    /// Returns the dealt cards back into the shoe and shuffles.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.current_index = 0;
    }

    /// Shuffles, then forces cards with the given blackjack values to the
    /// frontmost positions of the shoe. Panics if the shoe cannot satisfy
    /// the request.
    pub fn shuffle_with_firsts<R: Rng>(&mut self, rng: &mut R, firsts: &[u8]) {
        self.shuffle(rng);
        for (position, &blackjack_value) in firsts.iter().enumerate() {
            let found = self.cards[position..]
                .iter()
                .position(|card| card.blackjack_value() == blackjack_value)
                .expect("the given first cards are invalid");
            self.cards.swap(position, position + found);
        }
    }

    /// Deals a card if the shoe is not empty. Returns None if empty.
    pub fn deal_card(&mut self) -> Option<Card> {
        if self.current_index >= self.cards.len() {
            None
        } else {
            let card = self.cards[self.current_index];
            self.current_index += 1;
            Some(card)
        }
    }

    /// Checks if the cut card has been reached.
    pub fn reached_cut_card(&self) -> bool {
        self.current_index >= self.cut_card_index
    }

    /// True when the next hand must start from a fresh shuffle.
    pub fn needs_reshuffle(&self) -> bool {
        self.remaining_cards() < RESHUFFLE_FLOOR || self.reached_cut_card()
    }

    pub fn remaining_cards(&self) -> usize {
        self.cards.len() - self.current_index
    }
}
