//! Yandex Rasp API response DTOs.
//!
//! These map directly onto the JSON returned by `/search/` and
//! `/stations_list/`. Collections default to empty because the API omits
//! them rather than sending empty arrays.

use serde::Deserialize;

/// Response from `/search/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Trips between the two stations. Absent when nothing runs that day.
    #[serde(default)]
    pub segments: Vec<SegmentDto>,

    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

/// A single trip in a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentDto {
    /// Departure, ISO 8601 with offset (e.g. "2024-03-15T06:12:00+03:00").
    pub departure: String,

    /// Arrival, same format as `departure`.
    pub arrival: String,

    /// Travel time in seconds. Sent as a float (e.g. `4380.0`).
    pub duration: f64,

    pub thread: ThreadDto,
}

/// The train "thread" a segment belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadDto {
    /// Human-readable route title, e.g. "Москва (Ленинградский вокзал) — Тверь".
    pub title: String,

    /// Train number.
    pub number: Option<String>,

    /// Transport subtype, e.g. "suburban".
    pub transport_type: Option<String>,
}

/// Response from `/stations_list/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationsListResponse {
    #[serde(default)]
    pub countries: Vec<CountryDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountryDto {
    pub title: Option<String>,
    #[serde(default)]
    pub regions: Vec<RegionDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionDto {
    pub title: Option<String>,
    #[serde(default)]
    pub settlements: Vec<SettlementDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlementDto {
    pub title: Option<String>,
    #[serde(default)]
    pub stations: Vec<StationDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub title: String,
    #[serde(default)]
    pub codes: CodesDto,
    pub transport_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodesDto {
    pub yandex_code: Option<String>,
}

impl StationsListResponse {
    /// Every station in the response, country → region → settlement order.
    pub fn stations(&self) -> impl Iterator<Item = &StationDto> {
        self.countries
            .iter()
            .flat_map(|c| &c.regions)
            .flat_map(|r| &r.settlements)
            .flat_map(|s| &s.stations)
    }
}
