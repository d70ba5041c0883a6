use super::party::Party;
use super::player::{Player, PlayerDistribution, PlayerId, Role};
use crate::error::GameError;
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::iter::repeat;

/// The participants of a session, in join order.
///
/// Join order doubles as the presidential rotation order.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PlayerDirectory {
    players: Vec<Player>,
    admin: Option<PlayerId>,
}

/// The result of removing a player from a [PlayerDirectory].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RemovalOutcome {
    NotFound,
    Removed {
        /// Join-order position the player held before removal.
        index: usize,
        /// The new admin, if the removed player was the admin.
        new_admin: Option<PlayerId>,
    },
    RemovedAndEmpty,
}

impl PlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player at the end of the join order; the first player to join becomes the admin.
    /// Returns `false` if the player is already present.
    pub fn add(&mut self, id: PlayerId) -> bool {
        if self.contains(&id) {
            return false;
        }
        if self.admin.is_none() {
            self.admin = Some(id.clone());
        }
        self.players.push(Player::new(id));
        true
    }

    pub fn remove(&mut self, id: &PlayerId) -> RemovalOutcome {
        let Some(index) = self.position(id) else {
            return RemovalOutcome::NotFound;
        };
        self.players.remove(index);

        if self.players.is_empty() {
            self.admin = None;
            return RemovalOutcome::RemovedAndEmpty;
        }

        let mut new_admin = None;
        if self.admin.as_ref() == Some(id) {
            let next = self.players[index % self.players.len()].id.clone();
            self.admin = Some(next.clone());
            new_admin = Some(next);
        }
        RemovalOutcome::Removed { index, new_admin }
    }

    /// Deals roles to every player. Fails without touching any player if the player count is
    /// unsupported or roles have already been dealt for this game.
    pub fn assign_roles(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        if self.players.iter().any(|p| p.role.is_some()) {
            return Err(GameError::RolesAlreadyAssigned);
        }
        let distribution = PlayerDistribution::new(self.players.len())?;

        let mut roles = Vec::with_capacity(distribution.num_players);
        roles.extend(repeat(Role::Liberal).take(distribution.liberals));
        roles.extend(repeat(Role::Fascist).take(distribution.fascists));
        roles.shuffle(rng);

        let fascists: Vec<usize> = (0..roles.len()).filter(|&i| roles[i] == Role::Fascist).collect();
        let hitler = *fascists.choose(rng).ok_or(GameError::InvariantViolation("no fascist to make Hitler"))?;
        roles[hitler] = Role::Hitler;

        for (player, role) in self.players.iter_mut().zip(roles) {
            player.role = Some(role);
        }
        Ok(())
    }

    /// Clears roles and status left behind by a finished game.
    pub fn reset(&mut self) {
        self.players.iter_mut().for_each(Player::reset);
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Gets the player at the given join-order position.
    pub fn at(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn admin(&self) -> Option<&PlayerId> {
        self.admin.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn role(&self, id: &PlayerId) -> Option<Role> {
        self.get(id).and_then(|p| p.role)
    }

    pub fn is_alive(&self, id: &PlayerId) -> bool {
        self.get(id).map(|p| p.alive).unwrap_or(false)
    }

    pub fn num_alive(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    /// Living players in join order, minus those excluded.
    pub fn alive_players(&self, exclude: &[PlayerId]) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.alive && !exclude.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Players holding the given role in join order, minus those excluded.
    pub fn players_with_role(&self, role: Role, exclude: &[PlayerId]) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.role == Some(role) && !exclude.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn hitler(&self) -> Option<&PlayerId> {
        self.players.iter().find(|p| p.role == Some(Role::Hitler)).map(|p| &p.id)
    }

    /// The party membership an investigation reveals.
    pub fn party_membership(&self, id: &PlayerId) -> Option<Party> {
        self.get(id).and_then(Player::party)
    }

    /// The role of every player in join order.
    pub fn role_assignment(&self) -> Vec<(PlayerId, Role)> {
        self.players
            .iter()
            .filter_map(|p| p.role.map(|role| (p.id.clone(), role)))
            .collect()
    }
}
