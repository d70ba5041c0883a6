use super::party::Party;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A voluntary, unverified public statement about hidden information.
///
/// Nothing checks a claim against what the player actually saw.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(tag = "type")]
pub enum Claim {
    /// The combination of policies a player says they were handed.
    Policies { liberal: usize, fascist: usize },
    /// The party a president says an investigated player belongs to.
    Loyalty { party: Party },
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Claim::Policies { liberal, fascist } => {
                let mut parts = vec![];
                if *liberal > 0 {
                    parts.push(format!("{liberal} Liberal"));
                }
                if *fascist > 0 {
                    parts.push(format!("{fascist} Fascist"));
                }
                f.write_str(&parts.join(", "))
            }
            Claim::Loyalty { party } => write!(f, "{party}"),
        }
    }
}

pub const DECLINE_LABEL: &str = "Don't claim";

/// Every claim that can be made about a hand of `num_cards` policies, most liberal first.
pub fn policy_claims(num_cards: usize) -> Vec<Claim> {
    (0..=num_cards)
        .rev()
        .map(|liberal| Claim::Policies {
            liberal,
            fascist: num_cards - liberal,
        })
        .collect()
}

pub fn loyalty_claims() -> Vec<Claim> {
    vec![
        Claim::Loyalty { party: Party::Liberal },
        Claim::Loyalty { party: Party::Fascist },
    ]
}

/// Option labels for a claim prompt; the first option declines.
pub fn claim_labels(claims: &[Claim]) -> Vec<String> {
    std::iter::once(DECLINE_LABEL.to_string())
        .chain(claims.iter().map(Claim::to_string))
        .collect()
}

/// Maps an answer to a claim prompt built with [claim_labels] back to the claim made.
pub fn claim_from_choice(claims: &[Claim], choice: usize) -> Option<Claim> {
    choice.checked_sub(1).and_then(|i| claims.get(i).copied())
}

/// Describes a hand of policies the way a claim would.
pub fn describe(cards: &[Party]) -> Claim {
    let liberal = cards.iter().filter(|c| **c == Party::Liberal).count();
    Claim::Policies {
        liberal,
        fascist: cards.len() - liberal,
    }
}
