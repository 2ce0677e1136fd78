//! Utility functions for the matchmaking demo

use crate::types::GAME_SERVER_PORT;
use chrono::{DateTime, Local, TimeZone, Timelike};
use rand::Rng;

/// Get the current local timestamp
pub fn current_timestamp() -> DateTime<Local> {
    Local::now()
}

/// Format a run timestamp as `YYYY-MM-DDTHH:MM:SS.ss` (hundredths, truncated)
pub fn format_run_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // Leap seconds report nanos >= 1e9; clamp to keep two digits
    let hundredths = (at.nanosecond() / 10_000_000).min(99);
    format!("{}.{:02}", at.format("%Y-%m-%dT%H:%M:%S"), hundredths)
}

/// Build the id of the `index`-th proposal of a run
pub fn match_id(profile_name: &str, run_timestamp: &str, index: usize) -> String {
    format!("profile-{}-time-{}-num-{}", profile_name, run_timestamp, index)
}

/// Pick a synthetic game server address uniformly from the IPv4 space
pub fn random_connection_string() -> String {
    let mut rng = rand::thread_rng();
    let octets: [u8; 4] = rng.gen();
    format!(
        "{}.{}.{}.{}:{}",
        octets[0], octets[1], octets[2], octets[3], GAME_SERVER_PORT
    )
}
