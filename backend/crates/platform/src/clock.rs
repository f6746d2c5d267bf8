//! Wall clock helpers

use chrono::Utc;

/// Current time as unsigned epoch milliseconds.
///
/// Clamps to zero for clocks set before the epoch.
pub fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}
