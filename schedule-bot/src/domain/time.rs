//! Countdown arithmetic for departures.

use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Whole minutes until a departure.
///
/// Computed as `floor(seconds / 60)`, so a train leaving in 59 seconds is
/// "0min" away.
///
/// # Examples
///
/// ```
/// use schedule_bot::domain::Countdown;
///
/// assert_eq!(Countdown::from_minutes(125).to_string(), "2h 5min");
/// assert_eq!(Countdown::from_minutes(45).to_string(), "45min");
/// assert_eq!(Countdown::from_minutes(60).to_string(), "1h 0min");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Countdown {
    minutes: i64,
}

impl Countdown {
    pub fn from_minutes(minutes: i64) -> Self {
        Self { minutes }
    }

    /// Countdown from `now` until `departure`.
    pub fn between(now: DateTime<FixedOffset>, departure: DateTime<FixedOffset>) -> Self {
        let secs = (departure - now).num_seconds();
        Self {
            minutes: secs.div_euclid(60),
        }
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.minutes.max(0);
        if minutes >= 60 {
            write!(f, "{}h {}min", minutes / 60, minutes % 60)
        } else {
            write!(f, "{}min", minutes)
        }
    }
}
