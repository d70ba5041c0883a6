use super::party::Party;
use serde::{Deserialize, Serialize};

pub const MAX_LIBERAL_CARDS: usize = 5;
pub const MAX_FASCIST_CARDS: usize = 6;

/// Fascist policies needed before electing Hitler chancellor wins the game.
pub const HITLER_ELECTION_THRESHOLD: usize = 3;

/// The enacted policy tracks.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
pub struct Board {
    pub liberal_cards: usize,
    pub fascist_cards: usize,
}

impl Board {
    /// Creates a new board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play_card(&mut self, party: Party) {
        match party {
            Party::Liberal => self.liberal_cards += 1,
            Party::Fascist => self.fascist_cards += 1,
        }
    }

    pub fn count(&self, party: Party) -> usize {
        match party {
            Party::Liberal => self.liberal_cards,
            Party::Fascist => self.fascist_cards,
        }
    }

    pub fn total(&self) -> usize {
        self.liberal_cards + self.fascist_cards
    }

    /// Checks whether the given party's track is complete.
    pub fn target_reached(&self, party: Party) -> bool {
        match party {
            Party::Liberal => self.liberal_cards >= MAX_LIBERAL_CARDS,
            Party::Fascist => self.fascist_cards >= MAX_FASCIST_CARDS,
        }
    }

    /// Checks whether either party has completed their policy track.
    pub fn check_tracks(&self) -> Option<Party> {
        if self.target_reached(Party::Liberal) {
            return Some(Party::Liberal);
        }
        if self.target_reached(Party::Fascist) {
            return Some(Party::Fascist);
        }
        None
    }

    /// Checks whether electing Hitler chancellor now ends the game.
    pub fn hitler_can_win(&self) -> bool {
        self.fascist_cards >= HITLER_ELECTION_THRESHOLD
    }
}
