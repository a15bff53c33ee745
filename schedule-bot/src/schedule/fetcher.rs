//! Same-day filtering with next-day fallback.

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::{error, info};

use crate::domain::{Segment, Station};

use super::ScheduleSource;
use super::error::ScheduleError;

/// Which day an `Upcoming` list covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDay {
    /// Departures still ahead today, soonest first.
    Today,
    /// Nothing left today; the next day's list as the API returned it.
    NextDay,
}

/// Result of an upcoming-departures query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub day: ScheduleDay,
    pub date: NaiveDate,
    pub segments: Vec<Segment>,
}

impl Upcoming {
    pub fn is_next_day(&self) -> bool {
        self.day == ScheduleDay::NextDay
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Page sizes for the two queries.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Candidates requested for the current day.
    pub same_day_limit: u32,

    /// Trips requested for the next-day fallback.
    pub next_day_limit: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            same_day_limit: 50,
            next_day_limit: 5,
        }
    }
}

/// Fetches upcoming departures from a `ScheduleSource`.
pub struct ScheduleFetcher<S> {
    source: S,
    config: FetcherConfig,
}

impl<S: ScheduleSource> ScheduleFetcher<S> {
    pub fn new(source: S, config: FetcherConfig) -> Self {
        Self { source, config }
    }

    /// Departures from `origin` to `destination` that have not left by `as_of`.
    ///
    /// The calendar day is taken in `as_of`'s own offset. Same-day trips are
    /// filtered to `departure >= as_of` and stably sorted by departure. If
    /// none remain, the next day is queried and returned unfiltered.
    pub async fn fetch_upcoming(
        &self,
        origin: &Station,
        destination: &Station,
        as_of: DateTime<FixedOffset>,
    ) -> Result<Upcoming, ScheduleError> {
        let today = as_of.date_naive();

        let segments = self
            .search(origin, destination, today, self.config.same_day_limit)
            .await?;
        let upcoming = upcoming_only(segments, as_of);

        if !upcoming.is_empty() {
            return Ok(Upcoming {
                day: ScheduleDay::Today,
                date: today,
                segments: upcoming,
            });
        }

        let tomorrow = today
            .succ_opt()
            .ok_or(ScheduleError::DateOutOfRange(today))?;

        info!(
            origin = %origin.id,
            destination = %destination.id,
            date = %today,
            "no departures left today, trying next day"
        );

        let segments = self
            .search(origin, destination, tomorrow, self.config.next_day_limit)
            .await?;

        Ok(Upcoming {
            day: ScheduleDay::NextDay,
            date: tomorrow,
            segments,
        })
    }

    async fn search(
        &self,
        origin: &Station,
        destination: &Station,
        date: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Segment>, ScheduleError> {
        self.source
            .search(&origin.id, &destination.id, date, limit)
            .await
            .map_err(|source| {
                error!(
                    origin = %origin.id,
                    destination = %destination.id,
                    date = %date,
                    error = %source,
                    "schedule fetch failed"
                );
                ScheduleError::Upstream { date, source }
            })
    }
}

/// Drop departed trips and order the rest by departure (stable).
fn upcoming_only(segments: Vec<Segment>, as_of: DateTime<FixedOffset>) -> Vec<Segment> {
    let mut upcoming: Vec<Segment> = segments
        .into_iter()
        .filter(|s| s.departs_at_or_after(as_of))
        .collect();
    upcoming.sort_by_key(|s| s.departure);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;
    use crate::yandex::MockYandexClient;
    use chrono::Duration;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn as_of() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-15T12:00:00+03:00").unwrap()
    }

    fn station(id: &str, name: &str) -> Station {
        Station::new(StationId::parse(id).unwrap(), name)
    }

    fn origin() -> Station {
        station("s2006004", "Москва (Ленинградский вокзал)")
    }

    fn destination() -> Station {
        station("s9602944", "Клин")
    }

    /// A segment departing `offset_mins` after `as_of()`.
    fn segment(offset_mins: i64, title: &str) -> Segment {
        let departure = as_of() + Duration::minutes(offset_mins);
        Segment {
            departure,
            arrival: departure + Duration::minutes(75),
            duration_secs: 75 * 60,
            title: title.to_string(),
        }
    }

    fn fetcher(mock: &MockYandexClient) -> ScheduleFetcher<MockYandexClient> {
        ScheduleFetcher::new(mock.clone(), FetcherConfig::default())
    }

    #[test]
    fn default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.same_day_limit, 50);
        assert_eq!(config.next_day_limit, 5);
    }

    #[tokio::test]
    async fn drops_departed_and_sorts() {
        let mock = MockYandexClient::new().with_segments(
            &origin().id,
            &destination().id,
            date(),
            vec![segment(60, "c"), segment(-10, "a"), segment(5, "b")],
        );

        let got = fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of())
            .await
            .unwrap();

        assert_eq!(got.day, ScheduleDay::Today);
        assert_eq!(got.date, date());
        let titles: Vec<&str> = got.segments.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["b", "c"]);

        let calls = mock.search_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].limit, 50);
    }

    #[tokio::test]
    async fn departure_exactly_now_is_kept() {
        let mock = MockYandexClient::new().with_segments(
            &origin().id,
            &destination().id,
            date(),
            vec![segment(0, "now")],
        );

        let got = fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of())
            .await
            .unwrap();
        assert_eq!(got.segments.len(), 1);
        assert!(!got.is_next_day());
    }

    #[tokio::test]
    async fn ties_keep_response_order() {
        let mock = MockYandexClient::new().with_segments(
            &origin().id,
            &destination().id,
            date(),
            vec![segment(30, "second"), segment(30, "third"), segment(10, "first")],
        );

        let got = fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of())
            .await
            .unwrap();
        let titles: Vec<&str> = got.segments.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn falls_back_to_next_day_unfiltered() {
        let tomorrow = date().succ_opt().unwrap();
        let mock = MockYandexClient::new()
            .with_segments(
                &origin().id,
                &destination().id,
                date(),
                vec![segment(-120, "gone"), segment(-1, "just gone")],
            )
            .with_segments(
                &origin().id,
                &destination().id,
                tomorrow,
                vec![segment(24 * 60 - 600, "early"), segment(24 * 60 - 500, "later")],
            );

        let got = fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of())
            .await
            .unwrap();

        assert!(got.is_next_day());
        assert_eq!(got.date, tomorrow);
        assert_eq!(got.segments.len(), 2);

        let calls = mock.search_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].date, tomorrow);
        assert_eq!(calls[1].limit, 5);
    }

    #[tokio::test]
    async fn empty_today_and_tomorrow() {
        let mock = MockYandexClient::new();

        let got = fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of())
            .await
            .unwrap();

        assert!(got.is_next_day());
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn same_day_failure_is_error() {
        let mock = MockYandexClient::new().with_failing_date(date());

        let err = fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of())
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::Upstream { date: d, .. } if d == date()));
        assert_eq!(mock.search_calls().len(), 1);
    }

    #[tokio::test]
    async fn next_day_failure_is_error() {
        let tomorrow = date().succ_opt().unwrap();
        let mock = MockYandexClient::new().with_failing_date(tomorrow);

        let err = fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of())
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::Upstream { date: d, .. } if d == tomorrow));
    }

    #[tokio::test]
    async fn day_is_taken_in_as_of_offset() {
        // 23:30 UTC on the 14th is already the 15th in Moscow.
        let as_of_utc = DateTime::parse_from_rfc3339("2024-03-14T23:30:00+00:00").unwrap();
        let as_of_msk = as_of_utc.with_timezone(&FixedOffset::east_opt(3 * 3600).unwrap());
        let mock = MockYandexClient::new();

        fetcher(&mock)
            .fetch_upcoming(&origin(), &destination(), as_of_msk)
            .await
            .unwrap();

        assert_eq!(mock.search_calls()[0].date, date());
    }
}
