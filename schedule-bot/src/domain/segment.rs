//! Scheduled trips between two stations.

use chrono::{DateTime, FixedOffset};

use super::time::Countdown;

/// One scheduled point-to-point trip, as returned by a schedule search.
///
/// Instants keep the offset the API reported them in, so a departure is
/// displayed in the station's local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub departure: DateTime<FixedOffset>,
    pub arrival: DateTime<FixedOffset>,
    /// Travel time in whole seconds.
    pub duration_secs: i64,
    /// Carrier/thread title, e.g. "Москва — Тверь".
    pub title: String,
}

impl Segment {
    /// Travel time in minutes. Leftover seconds are dropped, not rounded.
    pub fn duration_mins(&self) -> i64 {
        self.duration_secs / 60
    }

    /// Time left until departure, measured from `as_of`.
    pub fn countdown(&self, as_of: DateTime<FixedOffset>) -> Countdown {
        Countdown::between(as_of, self.departure)
    }

    /// Whether the train leaves at or after `as_of`.
    pub fn departs_at_or_after(&self, as_of: DateTime<FixedOffset>) -> bool {
        self.departure >= as_of
    }
}
