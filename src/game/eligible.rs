use super::{player::PlayerId, GameState};

/// Living players at or below this count only term-limit the last chancellor.
const SMALL_GAME_PLAYERS: usize = 6;

/// Builds a list of players that may be chosen for some purpose, in join order.
pub struct EligiblePlayersBuilder<'a> {
    state: &'a GameState,
    eligible: Vec<PlayerId>,
}

impl GameState {
    /// Starts from every living player.
    pub fn eligible_players(&self) -> EligiblePlayersBuilder<'_> {
        EligiblePlayersBuilder {
            state: self,
            eligible: self.players.alive_players(&[]),
        }
    }

    /// Determines which players are eligible to be nominated chancellor by `president`.
    pub fn eligible_chancellors(&self, president: &PlayerId) -> Vec<PlayerId> {
        let mut result = self.eligible_players().exclude(president);

        if let Some(government) = &self.last_government {
            result = result.exclude(&government.chancellor);
            if self.players.num_alive() > SMALL_GAME_PLAYERS {
                result = result.exclude(&government.president);
            }
        }

        result.make()
    }
}

impl<'a> EligiblePlayersBuilder<'a> {
    pub fn exclude(mut self, player: &PlayerId) -> Self {
        self.eligible.retain(|p| p != player);
        self
    }

    pub fn not_investigated(mut self) -> Self {
        let players = &self.state.players;
        self.eligible
            .retain(|p| players.get(p).map(|p| !p.investigated).unwrap_or(false));
        self
    }

    pub fn make(self) -> Vec<PlayerId> {
        self.eligible
    }
}
