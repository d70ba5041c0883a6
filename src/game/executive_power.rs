use super::board::MAX_FASCIST_CARDS;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub enum ExecutivePower {
    /// The president must peek at the top three cards on the deck.
    PolicyPeek,
    /// The president must execute a player.
    Execution,
    /// The president must investigate a player's loyalty.
    InvestigateLoyalty,
    /// The president must call a special election.
    SpecialElection,
}

impl fmt::Display for ExecutivePower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutivePower::PolicyPeek => "policyPeek",
            ExecutivePower::Execution => "execution",
            ExecutivePower::InvestigateLoyalty => "investigate",
            ExecutivePower::SpecialElection => "specialElection",
        };
        f.write_str(name)
    }
}

/// Which executive power, if any, each enacted fascist policy unlocks.
///
/// Entry `i` is the power granted by the `i + 1`th fascist policy. The last fascist
/// policy ends the game, so it never grants a power.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(transparent)]
pub struct PowerTable([Option<ExecutivePower>; MAX_FASCIST_CARDS - 1]);

impl PowerTable {
    pub fn new(powers: [Option<ExecutivePower>; MAX_FASCIST_CARDS - 1]) -> Self {
        Self(powers)
    }

    /// The standard board for the given number of players.
    pub fn standard(num_players: usize) -> Self {
        use ExecutivePower::*;
        let powers = match num_players {
            0..=6 => [None, None, Some(PolicyPeek), Some(Execution), Some(Execution)],
            7..=8 => [None, Some(InvestigateLoyalty), Some(SpecialElection), Some(Execution), Some(Execution)],
            _ => [
                Some(InvestigateLoyalty),
                Some(InvestigateLoyalty),
                Some(SpecialElection),
                Some(Execution),
                Some(Execution),
            ],
        };
        Self(powers)
    }

    /// A board without any executive powers.
    pub fn empty() -> Self {
        Self([None; MAX_FASCIST_CARDS - 1])
    }

    /// Gets the executive power unlocked once `fascist_cards` fascist policies are enacted.
    pub fn power_at(&self, fascist_cards: usize) -> Option<ExecutivePower> {
        fascist_cards.checked_sub(1).and_then(|i| self.0.get(i).copied().flatten())
    }
}
