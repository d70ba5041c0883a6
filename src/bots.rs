//! Stand-in players and a log-only broadcast, for running games without a transport.

use crate::error::InteractionError;
use crate::game::claim::{describe, policy_claims, Claim};
use crate::game::party::Party;
use crate::game::{Announcement, Broadcast, Interaction, Notice, PlayerId, Prompt};
use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;

/// Chance that a bot votes for a proposed government.
const YES_PROBABILITY: f64 = 0.7;

/// Chance that a bot tells the truth about the policies it was handed.
const HONESTY: f64 = 0.8;

/// Bots that pick options at random, vote yes most of the time and mostly tell the truth.
pub struct RandomBots {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomBots {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> Result<T, InteractionError> {
        let mut rng = self.rng.lock().map_err(|_| InteractionError::PlayerUnavailable)?;
        Ok(f(&mut rng))
    }

    /// Picks the option naming what the bot actually saw or, now and then, anything else.
    fn claim(&self, cards: &[Party], options: &[String]) -> Result<usize, InteractionError> {
        let truth = describe(cards);
        let honest = position_of(&policy_claims(cards.len()), truth);
        self.with_rng(|rng| match honest {
            Some(index) if rng.gen_bool(HONESTY) => index,
            _ => rng.gen_range(0..options.len()),
        })
    }
}

/// Index of a claim among the options of a claim prompt, which put the decline option first.
fn position_of(claims: &[Claim], claim: Claim) -> Option<usize> {
    claims.iter().position(|c| *c == claim).map(|i| i + 1)
}

#[async_trait]
impl Interaction for RandomBots {
    async fn choose(&self, player: &PlayerId, prompt: Prompt, options: &[String]) -> Result<usize, InteractionError> {
        if options.is_empty() {
            return Err(InteractionError::InvalidChoice { index: 0, options: 0 });
        }
        let choice = match &prompt {
            Prompt::ClaimPresidentHand { cards } | Prompt::PolicyPeek { cards } => self.claim(cards, options)?,
            Prompt::ClaimChancellorHand { cards } => self.claim(cards, options)?,
            _ => self.with_rng(|rng| rng.gen_range(0..options.len()))?,
        };
        log::debug!("{} answers {:?} with {:?}", player, prompt, options[choice]);
        Ok(choice)
    }

    async fn vote(&self, player: &PlayerId, prompt: Prompt, yes_label: &str, no_label: &str) -> Result<bool, InteractionError> {
        let vote = self.with_rng(|rng| rng.gen_bool(YES_PROBABILITY))?;
        log::debug!("{} votes {} on {:?}", player, if vote { yes_label } else { no_label }, prompt);
        Ok(vote)
    }

    async fn inform(&self, player: &PlayerId, notice: Notice) -> Result<(), InteractionError> {
        log::debug!("{} is told {:?}", player, notice);
        Ok(())
    }
}

/// Writes every announcement to the log as JSON.
pub struct LogBroadcast;

#[async_trait]
impl Broadcast for LogBroadcast {
    async fn announce(&self, announcement: Announcement) {
        match serde_json::to_string(&announcement) {
            Ok(json) => log::info!("{}", json),
            Err(err) => log::error!("Could not serialize announcement: {}", err),
        }
    }
}
