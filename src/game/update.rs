use super::{
    claim::Claim, deck::Distribution, executive_power::ExecutivePower, party::Party, player::PlayerId, player::Role,
    Phase, WinCondition,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A public, narrator-style message for every player in the session.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(tag = "type")]
pub enum Announcement {
    GameStarted {
        players: Vec<PlayerId>,
    },
    /// Marks the boundary between two phases of the game.
    Phase {
        phase: Phase,
    },
    PresidentialCandidate {
        player: PlayerId,
        special: bool,
    },
    ChancellorNominated {
        president: PlayerId,
        chancellor: PlayerId,
    },
    ElectionResult {
        votes: Vec<(PlayerId, bool)>,
        passed: bool,
        election_tracker: usize,
    },
    Chaos {
        policy: Party,
    },
    NotHitler {
        player: PlayerId,
    },
    VetoProposed {
        chancellor: PlayerId,
    },
    VetoOutcome {
        accepted: bool,
    },
    PolicyEnacted {
        policy: Party,
        liberal_cards: usize,
        fascist_cards: usize,
    },
    DeckReshuffled,
    DeckStatus {
        remaining: usize,
        distribution: Distribution,
    },
    Claim {
        player: PlayerId,
        claim: Claim,
    },
    NoClaim {
        player: PlayerId,
    },
    ExecutivePower {
        president: PlayerId,
        power: ExecutivePower,
    },
    Investigated {
        president: PlayerId,
        player: PlayerId,
    },
    PolicyPeeked {
        president: PlayerId,
    },
    Executed {
        player: PlayerId,
    },
    SpecialElectionCalled {
        president: PlayerId,
        candidate: PlayerId,
    },
    PlayerLeft {
        player: PlayerId,
    },
    GameOver {
        outcome: WinCondition,
        winner: Party,
        roles: Vec<(PlayerId, Role)>,
    },
    GameAborted {
        reason: String,
    },
}

/// Fan-out of announcements, implemented by the transport layer.
///
/// Returns once delivery has been attempted to every player in the directory.
#[async_trait]
pub trait Broadcast: Send + Sync {
    async fn announce(&self, announcement: Announcement);
}
