//! Route store error types.

use std::path::PathBuf;

/// Rejections from route store operations. None of these mutate the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The user already saved this origin/destination pair
    #[error("route between these stations already saved as {existing:?}")]
    DuplicatePair { existing: String },

    /// The user is at the per-user route limit
    #[error("route limit of {limit} reached")]
    CapacityExceeded { limit: usize },

    /// No route at this position (stale menu reference)
    #[error("no route at position {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Route name is blank
    #[error("route name must not be empty")]
    EmptyName,

    /// Route name is too long
    #[error("route name longer than {max} characters")]
    NameTooLong { max: usize },
}

/// Failures writing or reading route files.
///
/// These are logged by the store and never reach users.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode routes: {0}")]
    Encode(#[from] serde_json::Error),
}
