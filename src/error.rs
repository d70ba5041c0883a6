use crate::game::PlayerId;
use thiserror::Error;

/// The result of attempting to perform an invalid operation on a [GameState](crate::game::GameState),
/// a [RoundEngine](crate::game::RoundEngine) or a [Session](crate::session::Session).
#[derive(Error, Debug)]
pub enum GameError {
    #[error("too few players in the game")]
    InsufficientPlayers,
    #[error("too many players in the game")]
    TooManyPlayers,
    #[error("roles have already been assigned for this game")]
    RolesAlreadyAssigned,
    #[error("invalid combination of game options")]
    InvalidGameOptions,
    #[error("{player} could not complete a prompt: {source}")]
    Interaction {
        player: PlayerId,
        #[source]
        source: InteractionError,
    },
    #[error("{player} left the game")]
    PlayerLeft { player: PlayerId },
    #[error("no eligible players remain for this office")]
    NoEligibleCandidates,
    #[error("the game was cancelled")]
    Cancelled,
    #[error("cannot draw {requested} policies from a deck of {available}")]
    InsufficientDeck { requested: usize, available: usize },
    #[error("internal invariant violated: {0}")]
    InvariantViolation(&'static str),
    #[error("game does not exist")]
    GameNotFound,
    #[error("no player exists with the given name")]
    PlayerNotFound,
    #[error("player has already joined the game")]
    AlreadyJoined,
    #[error("cannot join a game in progress")]
    CannotJoinStartedGame,
    #[error("only the admin can do this")]
    NotAdmin,
    #[error("this action cannot be performed during this phase of the game")]
    InvalidAction,
}

/// Broad classes of [GameError], used by the supervisor to decide how to report a failure.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// The game could not start; nothing was changed.
    Configuration,
    /// A player could not complete a prompt, left, or the run was cancelled.
    Interaction,
    /// A programming defect.
    Invariant,
    /// A lobby or session management request was rejected.
    Session,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        use GameError::*;
        match self {
            InsufficientPlayers | TooManyPlayers | RolesAlreadyAssigned | InvalidGameOptions => {
                ErrorKind::Configuration
            }
            Interaction { .. } | PlayerLeft { .. } | NoEligibleCandidates | Cancelled => ErrorKind::Interaction,
            InsufficientDeck { .. } | InvariantViolation(_) => ErrorKind::Invariant,
            GameNotFound | PlayerNotFound | AlreadyJoined | CannotJoinStartedGame | NotAdmin | InvalidAction => {
                ErrorKind::Session
            }
        }
    }

    /// Returns `true` if the session can carry on (e.g. start a new game) after this error.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Invariant
    }
}

/// The reason a player could not complete a prompt.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum InteractionError {
    #[error("the player did not answer in time")]
    ChoiceTimeout,
    #[error("the player is no longer reachable")]
    PlayerUnavailable,
    #[error("option {index} is out of range for {options} options")]
    InvalidChoice { index: usize, options: usize },
}
