//! Mock Yandex client for testing without API access.
//!
//! Serves canned schedules and a canned station directory, and records every
//! call so tests can assert which requests were (or were not) made.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;

use crate::domain::{Segment, Station, StationId};
use crate::schedule::ScheduleSource;
use crate::stations::StationDirectory;

use super::error::YandexError;

type ScheduleKey = (StationId, StationId, NaiveDate);

/// A recorded `search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub from: StationId,
    pub to: StationId,
    pub date: NaiveDate,
    pub limit: u32,
}

#[derive(Default)]
struct MockState {
    schedules: HashMap<ScheduleKey, Vec<Segment>>,
    failing_dates: HashSet<NaiveDate>,
    directory: Vec<Station>,
    directory_fails: bool,
    search_calls: Vec<SearchCall>,
    lookup_calls: Vec<String>,
}

/// Mock client that serves in-memory data.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect the recorded calls through another.
#[derive(Clone, Default)]
pub struct MockYandexClient {
    state: Arc<Mutex<MockState>>,
}

impl MockYandexClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `segments` (in this order) for the given pair and date.
    pub fn with_segments(
        self,
        from: &StationId,
        to: &StationId,
        date: NaiveDate,
        segments: Vec<Segment>,
    ) -> Self {
        self.lock()
            .schedules
            .insert((from.clone(), to.clone(), date), segments);
        self
    }

    /// Make every search for `date` fail with an API error.
    pub fn with_failing_date(self, date: NaiveDate) -> Self {
        self.lock().failing_dates.insert(date);
        self
    }

    /// Serve this directory for every lookup, like the real API which
    /// returns its full list regardless of the query.
    pub fn with_directory(self, stations: Vec<Station>) -> Self {
        self.lock().directory = stations;
        self
    }

    /// Make every directory lookup fail.
    pub fn with_failing_directory(self) -> Self {
        self.lock().directory_fails = true;
        self
    }

    pub fn search_calls(&self) -> Vec<SearchCall> {
        self.lock().search_calls.clone()
    }

    pub fn lookup_calls(&self) -> Vec<String> {
        self.lock().lookup_calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScheduleSource for MockYandexClient {
    async fn search(
        &self,
        from: &StationId,
        to: &StationId,
        date: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Segment>, YandexError> {
        let mut state = self.lock();
        state.search_calls.push(SearchCall {
            from: from.clone(),
            to: to.clone(),
            date,
            limit,
        });

        if state.failing_dates.contains(&date) {
            return Err(YandexError::ApiError {
                status: 503,
                message: format!("mock failure for {date}"),
            });
        }

        let key = (from.clone(), to.clone(), date);
        Ok(state
            .schedules
            .get(&key)
            .map(|segments| segments.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}

impl StationDirectory for MockYandexClient {
    async fn lookup(&self, query: &str) -> Result<Vec<Station>, YandexError> {
        let mut state = self.lock();
        state.lookup_calls.push(query.to_string());

        if state.directory_fails {
            return Err(YandexError::ApiError {
                status: 500,
                message: "mock directory failure".to_string(),
            });
        }

        Ok(state.directory.clone())
    }
}
