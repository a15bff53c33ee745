//! Upcoming-departure lookup between two stations.

mod error;
mod fetcher;

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{Segment, StationId};
use crate::yandex::YandexError;

pub use error::ScheduleError;
pub use fetcher::{FetcherConfig, ScheduleDay, ScheduleFetcher, Upcoming};

/// Source of trips between two stations on a date.
pub trait ScheduleSource: Send + Sync {
    /// Trips in response order, at most `limit` of them.
    fn search(
        &self,
        from: &StationId,
        to: &StationId,
        date: NaiveDate,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Segment>, YandexError>> + Send;
}
