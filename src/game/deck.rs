use super::party::Party;
use crate::error::GameError;
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::iter::repeat;

pub const LIBERAL_POLICIES: usize = 6;
pub const FASCIST_POLICIES: usize = 11;
pub const TOTAL_POLICIES: usize = LIBERAL_POLICIES + FASCIST_POLICIES;

/// The policy draw pile and discard pile.
///
/// The top of the draw pile is the end of `draw`.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct Deck {
    pub(crate) draw: Vec<Party>,
    pub(crate) discard: Vec<Party>,
}

/// The number of each kind of policy remaining in the draw pile.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
pub struct Distribution {
    pub liberal: usize,
    pub fascist: usize,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.liberal + self.fascist
    }
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to a full, unshuffled deck with an empty discard pile.
    pub fn populate(&mut self) {
        self.draw.clear();
        self.discard.clear();
        self.draw.extend(repeat(Party::Fascist).take(FASCIST_POLICIES));
        self.draw.extend(repeat(Party::Liberal).take(LIBERAL_POLICIES));
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.draw.shuffle(rng);
    }

    /// Removes the top `n` policies, top-most first.
    pub fn draw_top(&mut self, n: usize) -> Result<Vec<Party>, GameError> {
        if self.draw.len() < n {
            return Err(GameError::InsufficientDeck {
                requested: n,
                available: self.draw.len(),
            });
        }
        let mut cards = self.draw.split_off(self.draw.len() - n);
        cards.reverse();
        Ok(cards)
    }

    /// Draws the top three policies for a legislative session.
    pub fn draw_three(&mut self) -> Result<[Party; 3], GameError> {
        let cards = self.draw_top(3)?;
        Ok([cards[0], cards[1], cards[2]])
    }

    /// Looks at the top three policies without removing them, top-most first.
    pub fn peek_three(&self) -> Result<[Party; 3], GameError> {
        let len = self.draw.len();
        if len < 3 {
            return Err(GameError::InsufficientDeck { requested: 3, available: len });
        }
        Ok([self.draw[len - 1], self.draw[len - 2], self.draw[len - 3]])
    }

    /// Puts drawn policies back on top of the draw pile, so the first given ends up on top.
    pub fn return_to_top(&mut self, cards: &[Party]) {
        self.draw.extend(cards.iter().rev());
    }

    pub fn discard(&mut self, card: Party) {
        self.discard.push(card);
    }

    /// Shuffles the discard pile into the deck, if there are fewer than three cards in the draw deck.
    /// Returns whether a reshuffle took place.
    pub fn reshuffle_if_needed(&mut self, rng: &mut impl Rng) -> bool {
        if self.draw.len() >= 3 {
            return false;
        }
        self.draw.append(&mut self.discard);
        self.draw.shuffle(rng);
        true
    }

    /// The number of cards in the draw pile.
    pub fn count(&self) -> usize {
        self.draw.len()
    }

    pub fn discard_count(&self) -> usize {
        self.discard.len()
    }

    pub fn distribution(&self) -> Distribution {
        let liberal = self.draw.iter().filter(|c| **c == Party::Liberal).count();
        Distribution {
            liberal,
            fascist: self.draw.len() - liberal,
        }
    }
}
