use super::board::MAX_FASCIST_CARDS;
use super::executive_power::PowerTable;
use crate::error::GameError;
use serde::{Deserialize, Serialize};

/// Fascist policies needed before the chancellor may propose a veto.
pub const DEFAULT_VETO_THRESHOLD: usize = 5;

/// Options for customising a game of Secret Hitler.
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct GameOptions {
    /// The executive powers on the fascist track; the standard board for the player count if unset.
    pub powers: Option<PowerTable>,
    /// The number of enacted fascist policies that unlocks the veto.
    pub veto_threshold: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            powers: None,
            veto_threshold: DEFAULT_VETO_THRESHOLD,
        }
    }
}

impl GameOptions {
    /// Returns a `GameError` if the options cannot produce a playable game.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.veto_threshold == 0 || self.veto_threshold >= MAX_FASCIST_CARDS {
            return Err(GameError::InvalidGameOptions);
        }
        Ok(())
    }

    /// Gets the executive power board for the given number of players.
    pub fn power_table(&self, num_players: usize) -> PowerTable {
        self.powers.unwrap_or_else(|| PowerTable::standard(num_players))
    }

    pub fn veto_unlocked(&self, fascist_cards: usize) -> bool {
        fascist_cards >= self.veto_threshold
    }
}
