//! Wall-clock helpers shared by the engines.

use std::time::{SystemTime, UNIX_EPOCH};

/// Whole seconds since the Unix epoch, negative for instants before it.
#[must_use]
pub fn unix_secs(at: SystemTime) -> i64 {
    match at.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}
