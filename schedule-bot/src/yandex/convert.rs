//! Conversion from Yandex DTOs to domain types.

use chrono::{DateTime, FixedOffset};

use crate::domain::{Segment, Station, StationId};

use super::types::{SegmentDto, StationsListResponse};

/// Error converting API data into domain types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid {field} timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("invalid duration: {0}")]
    InvalidDuration(f64),
}

/// Parse an API timestamp.
///
/// The API sends RFC 3339 (`+03:00`); the compact `+0300` offset form is
/// accepted as well.
pub fn parse_timestamp(
    field: &'static str,
    value: &str,
) -> Result<DateTime<FixedOffset>, ConversionError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map_err(|_| ConversionError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Convert one search segment.
pub fn convert_segment(dto: &SegmentDto) -> Result<Segment, ConversionError> {
    if !dto.duration.is_finite() || dto.duration < 0.0 {
        return Err(ConversionError::InvalidDuration(dto.duration));
    }

    Ok(Segment {
        departure: parse_timestamp("departure", &dto.departure)?,
        arrival: parse_timestamp("arrival", &dto.arrival)?,
        duration_secs: dto.duration as i64,
        title: dto.thread.title.clone(),
    })
}

/// Convert all segments, preserving response order.
///
/// One bad segment fails the whole batch; a partially understood schedule
/// would silently hide trains.
pub fn convert_segments(dtos: &[SegmentDto]) -> Result<Vec<Segment>, ConversionError> {
    dtos.iter().map(convert_segment).collect()
}

/// Flatten a station directory response, keeping response order.
///
/// Stations without a usable code cannot be queried later, so they are
/// dropped.
pub fn convert_directory(resp: &StationsListResponse) -> Vec<Station> {
    resp.stations()
        .filter_map(|s| {
            let code = s.codes.yandex_code.as_deref()?;
            StationId::parse(code)
                .ok()
                .map(|id| Station::new(id, s.title.clone()))
        })
        .collect()
}
