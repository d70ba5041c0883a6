use serde::{Deserialize, Serialize};
use std::fmt;

/// The two political parties of the game; also the two kinds of policy tile.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub enum Party {
    Liberal,
    Fascist,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Liberal => f.write_str("Liberal"),
            Party::Fascist => f.write_str("Fascist"),
        }
    }
}
