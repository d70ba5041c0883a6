use self::board::Board;
use self::deck::Deck;
pub use self::directory::{PlayerDirectory, RemovalOutcome};
use self::government::Government;
use self::party::Party;
use self::player::Role;
use crate::error::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod board;
pub mod claim;
pub mod control;
pub mod deck;
mod directory;
mod eligible;
mod engine;
pub mod executive_power;
pub mod government;
pub mod options;
pub mod party;
pub mod player;
pub mod prompt;
#[cfg(test)]
pub(crate) mod test;
pub mod update;
pub mod votes;

pub use self::engine::RoundEngine;
pub use self::executive_power::{ExecutivePower, PowerTable};
pub use self::options::GameOptions;
pub use self::player::PlayerId;
pub use self::prompt::{Interaction, Notice, Prompt};
pub use self::update::{Announcement, Broadcast};

/// Failed elections in a row that throw the country into chaos.
pub const CHAOS_THRESHOLD: usize = 3;

/// The state of one session's game: who is playing, the deck, the board and the election bookkeeping.
///
/// Between games it holds only the lobby; [GameState::reset] returns it there after a game ends.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct GameState {
    pub(crate) players: PlayerDirectory,
    pub(crate) deck: Deck,
    pub(crate) board: Board,
    /// The sitting government, once one has been elected.
    pub(crate) president: Option<PlayerId>,
    pub(crate) chancellor: Option<PlayerId>,
    /// The last elected government, which is term-limited.
    pub(crate) last_government: Option<Government>,
    pub(crate) election_tracker: usize,
    /// Join-order position of the last president chosen by rotation.
    pub(crate) presidential_turn: Option<usize>,
    /// A candidate named by a special election, who takes the next turn out of rotation.
    pub(crate) special_candidate: Option<PlayerId>,
}

/// Represents the current phase in the game loop.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum Phase {
    Lobby,
    ElectionRound,
    LegislativeSession,
    ExecutiveAction,
    GameOver(WinCondition),
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum WinCondition {
    /// The liberals completed their policy track.
    LiberalPolicyTrack,
    /// The fascists completed their policy track.
    FascistPolicyTrack,
    /// Hitler was elected chancellor
    HitlerChancellor,
    /// Hitler was executed
    HitlerExecuted,
}

impl WinCondition {
    pub fn winner(&self) -> Party {
        match self {
            WinCondition::LiberalPolicyTrack | WinCondition::HitlerExecuted => Party::Liberal,
            WinCondition::FascistPolicyTrack | WinCondition::HitlerChancellor => Party::Fascist,
        }
    }

    pub fn policy_track(party: Party) -> Self {
        match party {
            Party::Liberal => WinCondition::LiberalPolicyTrack,
            Party::Fascist => WinCondition::FascistPolicyTrack,
        }
    }
}

impl fmt::Display for WinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WinCondition::LiberalPolicyTrack => "LiberalPolicyTrack",
            WinCondition::FascistPolicyTrack => "FascistPolicyTrack",
            WinCondition::HitlerChancellor => "HitlerChancellor",
            WinCondition::HitlerExecuted => "HitlerExecuted",
        };
        f.write_str(name)
    }
}

/// How a finished game ended, for the supervisor to announce and keep.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct GameResult {
    pub winner: Party,
    pub outcome: WinCondition,
    pub roles: Vec<(PlayerId, Role)>,
    pub seed: u64,
    pub started: String,
    pub finished: String,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn election_tracker(&self) -> usize {
        self.election_tracker
    }

    pub fn president(&self) -> Option<&PlayerId> {
        self.president.as_ref()
    }

    pub fn chancellor(&self) -> Option<&PlayerId> {
        self.chancellor.as_ref()
    }

    pub fn last_government(&self) -> Option<&Government> {
        self.last_government.as_ref()
    }

    /// Adds a player to the lobby. Returns `false` if they have already joined.
    pub fn add_player(&mut self, player: PlayerId) -> bool {
        self.players.add(player)
    }

    /// Removes a player, keeping the presidential rotation pointed at the same next player.
    pub fn remove_player(&mut self, player: &PlayerId) -> RemovalOutcome {
        let outcome = self.players.remove(player);
        match &outcome {
            RemovalOutcome::Removed { index, .. } => {
                if let Some(turn) = self.presidential_turn {
                    self.presidential_turn = if *index <= turn { turn.checked_sub(1) } else { Some(turn) };
                }
                if self.special_candidate.as_ref() == Some(player) {
                    self.special_candidate = None;
                }
            }
            RemovalOutcome::RemovedAndEmpty => self.reset(),
            RemovalOutcome::NotFound => {}
        }
        outcome
    }

    /// Deals roles and prepares a fresh, shuffled deck.
    /// On error the state is left untouched.
    pub fn start(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        self.players.assign_roles(rng)?;
        self.deck.populate();
        self.deck.shuffle(rng);
        self.board = Board::new();
        self.president = None;
        self.chancellor = None;
        self.last_government = None;
        self.election_tracker = 0;
        self.presidential_turn = None;
        self.special_candidate = None;
        Ok(())
    }

    /// Returns everything but the lobby to its initial values, so the session can start a new game.
    pub fn reset(&mut self) {
        self.players.reset();
        self.deck = Deck::new();
        self.board = Board::new();
        self.president = None;
        self.chancellor = None;
        self.last_government = None;
        self.election_tracker = 0;
        self.presidential_turn = None;
        self.special_candidate = None;
    }

    pub fn enact_policy(&mut self, policy: Party) {
        self.board.play_card(policy);
    }

    /// Enacts the top policy of the deck, as happens when the country is thrown into chaos.
    pub fn enact_top_policy(&mut self) -> Result<Party, GameError> {
        let policy = self.deck.draw_top(1)?[0];
        self.enact_policy(policy);
        Ok(policy)
    }

    /// Advances the election tracker, returning its new value.
    pub fn advance_election_tracker(&mut self) -> usize {
        self.election_tracker += 1;
        self.election_tracker
    }

    pub fn reset_election_tracker(&mut self) {
        self.election_tracker = 0;
    }

    pub fn chaos_due(&self) -> bool {
        self.election_tracker >= CHAOS_THRESHOLD
    }

    /// Lifts the term limits of the last government.
    pub fn reset_term_limits(&mut self) {
        self.last_government = None;
    }

    /// Seats a newly elected government, which becomes the term-limited one.
    pub fn elect(&mut self, government: Government) {
        self.president = Some(government.president.clone());
        self.chancellor = Some(government.chancellor.clone());
        self.last_government = Some(government);
    }

    /// Finds the join-order position of the next living player after `turn`, wrapping around.
    /// With no previous turn the search starts from the first player.
    pub fn next_presidential_candidate(&self, turn: Option<usize>) -> Option<usize> {
        let n = self.players.len();
        let start = turn.map(|t| t + 1).unwrap_or(0);
        (start..n)
            .chain(0..start.min(n))
            .find(|idx| self.players.at(*idx).map(|p| p.alive).unwrap_or(false))
    }

    /// Picks the next presidential candidate: the special election candidate if one is pending,
    /// otherwise the next player in the rotation, which advances.
    pub fn take_presidential_candidate(&mut self) -> Option<(PlayerId, bool)> {
        if let Some(candidate) = self.special_candidate.take() {
            if self.players.is_alive(&candidate) {
                return Some((candidate, true));
            }
        }
        let idx = self.next_presidential_candidate(self.presidential_turn)?;
        self.presidential_turn = Some(idx);
        self.players.at(idx).map(|p| (p.id.clone(), false))
    }

    pub fn call_special_election(&mut self, candidate: PlayerId) {
        self.special_candidate = Some(candidate);
    }

    pub fn target_reached(&self, party: Party) -> bool {
        self.board.target_reached(party)
    }

    /// Returns whether the sitting chancellor is Hitler.
    pub fn hitler_elected(&self) -> bool {
        self.chancellor
            .as_ref()
            .and_then(|c| self.players.role(c))
            .map(|role| role == Role::Hitler)
            .unwrap_or(false)
    }

    /// Policies in the draw pile, the discard pile and on the board.
    pub fn total_policies(&self) -> usize {
        self.deck.count() + self.deck.discard_count() + self.board.total()
    }
}
