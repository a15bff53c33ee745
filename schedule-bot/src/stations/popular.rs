//! Curated popular stations.
//!
//! These are offered as menu buttons and resolve without a directory call.

use crate::domain::{Station, StationId};

/// (display name, station id), in menu order.
pub const POPULAR_STATIONS: &[(&str, &str)] = &[
    ("Москва (Ленинградский вокзал)", "s2006004"),
    ("Солнечногорск (Подсолнечная)", "s9603468"),
    ("Клин", "s9602944"),
    ("Тверь", "s9603093"),
    ("Торжок", "s9603013"),
];

/// Look up a popular station by its exact display name.
pub fn popular_station(name: &str) -> Option<Station> {
    POPULAR_STATIONS
        .iter()
        .find(|(key, _)| *key == name)
        .and_then(|(key, id)| StationId::parse(id).ok().map(|id| Station::new(id, *key)))
}

/// Display names of the popular stations, in menu order.
pub fn popular_names() -> impl Iterator<Item = &'static str> {
    POPULAR_STATIONS.iter().map(|(name, _)| *name)
}
