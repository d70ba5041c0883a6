use super::{party::Party, player::PlayerId, player::Role};
use crate::error::InteractionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The most options a single choice prompt may offer.
pub const MAX_OPTIONS: usize = 10;

/// What a player is being asked to decide. Carries any private information the decision needs,
/// so it must only ever be shown to the prompted player.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(tag = "type")]
pub enum Prompt {
    NominateChancellor,
    Vote {
        president: PlayerId,
        chancellor: PlayerId,
    },
    PresidentDiscard {
        cards: [Party; 3],
    },
    ChancellorEnact {
        cards: [Party; 2],
        can_veto: bool,
    },
    ApproveVeto,
    ClaimPresidentHand {
        cards: [Party; 3],
    },
    ClaimChancellorHand {
        cards: [Party; 2],
    },
    PolicyPeek {
        cards: [Party; 3],
    },
    ChoosePlayer {
        kind: ChoosePlayerKind,
    },
    InvestigationResult {
        player: PlayerId,
        party: Party,
    },
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub enum ChoosePlayerKind {
    /// The player is choosing another player to investigate their party membership
    Investigate,
    /// The player is choosing another player to execute
    Execute,
    /// The player is selecting the next presidential nominee
    NominatePresident,
}

/// Private information sent to one player without asking for a decision.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(tag = "type")]
pub enum Notice {
    Role {
        role: Role,
        /// The ordinary fascists this player knows about.
        fascists: Vec<PlayerId>,
        /// Hitler, if this player knows who it is.
        hitler: Option<PlayerId>,
    },
}

/// Per-player prompts, implemented by the transport layer.
///
/// Calls may block indefinitely; the engine races them against cancellation and departures.
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Asks a player to pick one of at most [MAX_OPTIONS] options, returning its index.
    async fn choose(&self, player: &PlayerId, prompt: Prompt, options: &[String]) -> Result<usize, InteractionError>;

    async fn vote(&self, player: &PlayerId, prompt: Prompt, yes_label: &str, no_label: &str) -> Result<bool, InteractionError>;

    /// Privately delivers information to a single player.
    async fn inform(&self, player: &PlayerId, notice: Notice) -> Result<(), InteractionError>;
}
