//! Station resolution.
//!
//! Maps free text typed by a user (or a popular-station button) to a
//! station identifier understood by the schedule API.

mod error;
mod popular;
mod resolver;

use std::future::Future;

use crate::domain::Station;
use crate::yandex::YandexError;

pub use error::ResolveError;
pub use popular::{POPULAR_STATIONS, popular_names, popular_station};
pub use resolver::StationResolver;

/// A searchable station directory.
pub trait StationDirectory: Send + Sync {
    /// Stations for a free-text query, in directory order.
    fn lookup(&self, query: &str) -> impl Future<Output = Result<Vec<Station>, YandexError>> + Send;
}
