//! Station identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// An opaque station identifier issued by the schedule API (e.g. `s9602944`).
///
/// The token is never interpreted, only compared. It is guaranteed to be
/// non-empty and free of whitespace.
///
/// # Examples
///
/// ```
/// use schedule_bot::domain::StationId;
///
/// let klin = StationId::parse("s9602944").unwrap();
/// assert_eq!(klin.as_str(), "s9602944");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("s96 02944").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Parse a station identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(InvalidStationId {
                reason: "must not contain whitespace",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = InvalidStationId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved station: identifier plus the name shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StationId::parse("s2006004").is_ok());
        assert!(StationId::parse("c213").is_ok());
    }

    #[test]
    fn reject_empty_and_whitespace() {
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse(" s1").is_err());
        assert!(StationId::parse("s1\t").is_err());
    }

    #[test]
    fn debug_and_display() {
        let id = StationId::parse("s9603093").unwrap();
        assert_eq!(format!("{}", id), "s9603093");
        assert_eq!(format!("{:?}", id), "StationId(s9603093)");
    }

    #[test]
    fn serde_roundtrip_rejects_invalid() {
        let id: StationId = serde_json::from_str("\"s9603013\"").unwrap();
        assert_eq!(id.as_str(), "s9603013");
        assert!(serde_json::from_str::<StationId>("\"\"").is_err());
    }
}
