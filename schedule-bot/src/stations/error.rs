//! Station resolution errors.

use crate::yandex::YandexError;

/// Why a station name could not be resolved.
///
/// Both variants are shown to the user as the same retry prompt; they are
/// kept apart so lookup failures are visible in the logs.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The directory answered, but no station title contains the query
    #[error("no station matching {0:?}")]
    NotFound(String),

    /// The directory could not be queried
    #[error("station lookup failed: {0}")]
    Lookup(#[from] YandexError),
}
