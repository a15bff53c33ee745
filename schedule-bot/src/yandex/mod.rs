//! Yandex Rasp (schedule API) client.
//!
//! Two endpoints are used:
//! - `/search/` returns the trips between two stations on a date
//! - `/stations_list/` returns the station directory, nested as
//!   country → region → settlement → station
//!
//! Timestamps carry their UTC offset (e.g. `+03:00`) and are kept as-is.

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, YandexClient, YandexConfig};
pub use convert::{ConversionError, convert_directory, convert_segments};
pub use error::YandexError;
pub use mock::{MockYandexClient, SearchCall};
pub use types::{SearchResponse, SegmentDto, StationDto, StationsListResponse};
