//! Utility functions.
//!
//! Collection of helpers used across the worker.

pub mod clock;
pub mod task;

pub use clock::{Clock, SystemClock};
pub use task::spawn_detached;

use std::time::Duration;

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse duration string (e.g., "300", "45s", "5m", "1h").
///
/// A bare number is seconds. Supported units:
/// - s: seconds
/// - m: minutes
/// - h: hours
/// - d: days
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(secs) = input.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let (split, unit) = input.char_indices().last()?;
    let amount: u64 = input[..split].parse().ok()?;

    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return None,
    };

    amount.checked_mul(multiplier).map(Duration::from_secs)
}
