//! Yandex Rasp HTTP client.
//!
//! Wraps the `/search/` and `/stations_list/` endpoints. Every request carries
//! the API key as a query parameter and is bounded by the configured timeout.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Segment, Station, StationId};
use crate::schedule::ScheduleSource;
use crate::stations::StationDirectory;

use super::convert::{convert_directory, convert_segments};
use super::error::YandexError;
use super::types::{SearchResponse, StationsListResponse};

/// Default base URL for the Yandex Rasp API.
pub const DEFAULT_BASE_URL: &str = "https://api.rasp.yandex.net/v3.0";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Only suburban trains are searched.
const TRANSPORT_TYPES: &str = "suburban";

/// Configuration for the Yandex client.
#[derive(Debug, Clone)]
pub struct YandexConfig {
    /// API key, sent as the `apikey` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Response language
    pub lang: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl YandexConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: "ru_RU".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Yandex Rasp API client.
#[derive(Debug, Clone)]
pub struct YandexClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    lang: String,
}

impl YandexClient {
    /// Create a new client with the given configuration.
    pub fn new(config: YandexConfig) -> Result<Self, YandexError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            lang: config.lang,
        })
    }

    /// Search trips between two stations on a date.
    ///
    /// Segments come back in response order. A day with no trips yields an
    /// empty list, not an error.
    pub async fn search(
        &self,
        from: &StationId,
        to: &StationId,
        date: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Segment>, YandexError> {
        let date = date.format("%Y-%m-%d").to_string();
        let limit = limit.to_string();

        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("from", from.as_str()),
                    ("to", to.as_str()),
                    ("date", date.as_str()),
                    ("transport_types", TRANSPORT_TYPES),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        debug!(
            from = %from,
            to = %to,
            date = %date,
            segments = response.segments.len(),
            "schedule search returned"
        );

        Ok(convert_segments(&response.segments)?)
    }

    /// Look up stations by free text.
    ///
    /// Returns stations in directory order (country, region, settlement).
    pub async fn stations_list(&self, query: &str) -> Result<Vec<Station>, YandexError> {
        let response: StationsListResponse =
            self.get_json("stations_list", &[("station", query)]).await?;

        Ok(convert_directory(&response))
    }

    /// Issue a GET and decode the JSON body, mapping failures to `YandexError`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YandexError> {
        let url = format!("{}/{}/", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("format", "json"),
                ("lang", self.lang.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(YandexError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(YandexError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| YandexError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl ScheduleSource for YandexClient {
    async fn search(
        &self,
        from: &StationId,
        to: &StationId,
        date: NaiveDate,
        limit: u32,
    ) -> Result<Vec<Segment>, YandexError> {
        YandexClient::search(self, from, to, date, limit).await
    }
}

impl StationDirectory for YandexClient {
    async fn lookup(&self, query: &str) -> Result<Vec<Station>, YandexError> {
        self.stations_list(query).await
    }
}
