use crate::game::{options::DEFAULT_VETO_THRESHOLD, GameOptions, PowerTable};
use anyhow::Context;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PLAYERS: usize = 5;
const DEFAULT_INACTIVITY_SECS: u64 = 600;

/// Process configuration, read from the environment (and a `.env` file, if present).
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of bot players in the demo session.
    pub players: usize,
    /// Seed for the game; random if unset.
    pub seed: Option<u64>,
    /// How long a session may sit idle before its game is cancelled.
    pub inactivity_timeout: Duration,
    pub opts: GameOptions,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let players = parse_var("SH_PLAYERS")?.unwrap_or(DEFAULT_PLAYERS);
        let seed = parse_var("SH_SEED")?;
        let inactivity_secs = parse_var("SH_INACTIVITY_SECS")?.unwrap_or(DEFAULT_INACTIVITY_SECS);
        let veto_threshold = parse_var("SH_VETO_THRESHOLD")?.unwrap_or(DEFAULT_VETO_THRESHOLD);
        let powers = match std::env::var("SH_POWERS") {
            Ok(json) => Some(parse_powers(&json)?),
            Err(_) => None,
        };

        let opts = GameOptions { powers, veto_threshold };
        opts.validate().context("invalid game options")?;

        Ok(Self {
            players,
            seed,
            inactivity_timeout: Duration::from_secs(inactivity_secs),
            opts,
        })
    }
}

/// Parses an executive power table such as `[null, null, "PolicyPeek", "Execution", "Execution"]`.
pub fn parse_powers(json: &str) -> anyhow::Result<PowerTable> {
    serde_json::from_str(json).context("SH_POWERS must be a JSON array of five powers or nulls")
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} is invalid: {value:?}")),
        Err(_) => Ok(None),
    }
}
