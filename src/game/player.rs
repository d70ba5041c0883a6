use super::party::Party;
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_PLAYERS: usize = 5;
pub const MAX_PLAYERS: usize = 10;

/// Opaque identity of a participant, stable for the lifetime of a session.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A game player.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Player {
    pub id: PlayerId,
    /// Unset until roles are assigned at the start of a game.
    pub role: Option<Role>,
    pub alive: bool,
    /// Publicly known not to be Hitler (elected chancellor after three fascist policies).
    pub not_hitler: bool,
    pub investigated: bool,
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub enum Role {
    Liberal,
    Fascist,
    Hitler,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Liberal => f.write_str("Liberal"),
            Role::Fascist => f.write_str("Fascist"),
            Role::Hitler => f.write_str("Hitler"),
        }
    }
}

impl Role {
    /// The party this role belongs to; Hitler reports as a fascist.
    pub fn party(&self) -> Party {
        match self {
            Role::Liberal => Party::Liberal,
            Role::Fascist | Role::Hitler => Party::Fascist,
        }
    }
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            role: None,
            alive: true,
            not_hitler: false,
            investigated: false,
        }
    }

    pub fn party(&self) -> Option<Party> {
        self.role.map(|role| role.party())
    }

    /// Clears everything a finished game left behind.
    pub fn reset(&mut self) {
        self.role = None;
        self.alive = true;
        self.not_hitler = false;
        self.investigated = false;
    }
}

/// The number of liberal and fascist cards dealt for a given player count.
///
/// One of the fascist cards is later turned into Hitler, so the fascist count
/// includes Hitler.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerDistribution {
    pub num_players: usize,
    pub liberals: usize,
    pub fascists: usize,
}

impl PlayerDistribution {
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        let (liberals, fascists) = match num_players {
            0..=4 => return Err(GameError::InsufficientPlayers),
            5 => (3, 2),
            6 => (4, 2),
            7 => (4, 3),
            8 => (5, 3),
            9 => (5, 4),
            10 => (6, 4),
            _ => return Err(GameError::TooManyPlayers),
        };
        Ok(Self { num_players, liberals, fascists })
    }

    /// The number of ordinary fascists, not counting Hitler.
    pub fn ordinary_fascists(&self) -> usize {
        self.fascists - 1
    }
}
