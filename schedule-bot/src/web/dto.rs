//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::dialogue::{Keyboard, Transition};
use crate::domain::{Route, Station};

/// An inbound chat message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Chat user identifier
    pub user_id: i64,

    /// Message text, or the label of a pressed button
    pub text: String,
}

/// The dialogue's answer to one message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// State the user's session is now in
    pub state: &'static str,

    /// Messages to send, in order
    pub messages: Vec<String>,

    /// Keyboard to show with the last message
    pub keyboard: Keyboard,
}

impl From<Transition> for MessageResponse {
    fn from(transition: Transition) -> Self {
        Self {
            state: transition.state.name(),
            messages: transition.reply.messages,
            keyboard: transition.reply.keyboard,
        }
    }
}

/// A station as shown to API clients.
#[derive(Debug, Serialize)]
pub struct StationInfo {
    /// Yandex station code, e.g. "s9602944"
    pub id: String,

    /// Display name
    pub name: String,
}

impl From<&Station> for StationInfo {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.as_str().to_string(),
            name: station.name.clone(),
        }
    }
}

/// A saved route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub name: String,
    pub origin: StationInfo,
    pub destination: StationInfo,
    /// RFC 3339 creation time
    pub created_at: String,
}

impl From<&Route> for RouteResult {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            origin: StationInfo::from(&route.origin),
            destination: StationInfo::from(&route.destination),
            created_at: route.created_at.to_rfc3339(),
        }
    }
}

/// Response for the saved-route listing.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub user_id: i64,

    /// Saved routes in insertion order
    pub routes: Vec<RouteResult>,

    /// Per-user route limit
    pub limit: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
