//! Toy game client for the front door
//!
//! This module holds the `FindMatch` conversation and the game loop that
//! drives it.

pub mod find_match;
pub mod game;

pub use find_match::{find_match, interpret_terminal_frame, FindMatchError, FrontDoorSession};
pub use game::{GameClient, GameClientConfig};
