//! Reminder send-window derivation.

use chrono::{DateTime, Duration, Utc};

/// Default lookahead for the dispatch job: a dose becomes eligible for a
/// reminder two minutes before its scheduled instant.
pub const DEFAULT_SEND_WINDOW_SECS: i64 = 120;

pub fn default_send_window() -> Duration {
    Duration::seconds(DEFAULT_SEND_WINDOW_SECS)
}

/// A SCHEDULED dose is eligible for a reminder while `scheduled_for`
/// lies within `[now, now + window]`. Past-due doses are the missed
/// sweep's business, not the dispatcher's.
pub fn within_send_window(
    scheduled_for: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    scheduled_for >= now && scheduled_for <= now + window
}
