//! Saved favorite routes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::station::{Station, StationId};

/// Chat user identifier, as assigned by the chat transport.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's saved origin/destination pair.
///
/// Routes are immutable once created; renaming means delete and re-add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub user_id: UserId,
    pub name: String,
    pub origin: Station,
    pub destination: Station,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// The (origin, destination) identity used for deduplication.
    pub fn pair(&self) -> (&StationId, &StationId) {
        (&self.origin.id, &self.destination.id)
    }

    /// Whether this route connects the same two stations, in the same direction.
    pub fn same_pair(&self, origin: &StationId, destination: &StationId) -> bool {
        &self.origin.id == origin && &self.destination.id == destination
    }
}
