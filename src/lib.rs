//! A Secret Hitler game engine.
//!
//! [game::RoundEngine] plays one game on a [game::GameState], talking to players only through the
//! [game::Interaction] and [game::Broadcast] ports. [session::SessionManager] keeps one game per
//! session and supervises the runs.

pub mod bots;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod time;
