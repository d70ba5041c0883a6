use super::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Tracks the vote of each player, in the order the votes were requested.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Votes {
    num_voters: usize,
    votes: Vec<(PlayerId, bool)>,
}

impl Votes {
    /// Creates a new `Votes`, where `num_voters` is the number of living players.
    pub fn new(num_voters: usize) -> Self {
        Self {
            num_voters,
            votes: Vec::with_capacity(num_voters),
        }
    }

    /// Returns whether the given player has cast their vote.
    pub fn has_cast(&self, player: &PlayerId) -> bool {
        self.votes.iter().any(|(p, _)| p == player)
    }

    /// Records the vote of a player.
    pub fn vote(&mut self, player: PlayerId, vote: bool) {
        if !self.has_cast(&player) {
            self.votes.push((player, vote));
        }
    }

    pub fn yes(&self) -> usize {
        self.votes.iter().filter(|(_, v)| *v).count()
    }

    /// A strict majority of all voters must vote yes.
    pub fn passed(&self) -> bool {
        self.yes() * 2 > self.num_voters
    }

    /// Gets the votes of each player.
    pub fn votes(&self) -> &[(PlayerId, bool)] {
        &self.votes
    }
}
