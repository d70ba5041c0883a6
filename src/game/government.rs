use super::player::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct Government {
    pub president: PlayerId,
    pub chancellor: PlayerId,
}
