//! Schedule fetch errors.

use chrono::NaiveDate;

use crate::yandex::YandexError;

/// Errors from fetching upcoming departures.
///
/// Any of these means no schedule is shown; partial results are never
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The schedule API failed (network, timeout, bad status, bad payload)
    #[error("schedule API failed for {date}: {source}")]
    Upstream {
        date: NaiveDate,
        #[source]
        source: YandexError,
    },

    /// No calendar day follows the query date
    #[error("no day after {0}")]
    DateOutOfRange(NaiveDate),
}
