//! Station name resolution.

use tracing::{debug, error};

use crate::cache::{CacheConfig, ResolutionCache};
use crate::domain::Station;

use super::StationDirectory;
use super::error::ResolveError;
use super::popular::popular_station;

/// Resolves user-typed station names to stations.
///
/// Popular stations win outright. Anything else goes to the directory, where
/// the first station (in directory order) whose title contains the query,
/// ignoring case, is chosen.
pub struct StationResolver<D> {
    directory: D,
    cache: ResolutionCache,
}

impl<D: StationDirectory> StationResolver<D> {
    pub fn new(directory: D, cache_config: &CacheConfig) -> Self {
        Self {
            directory,
            cache: ResolutionCache::new(cache_config),
        }
    }

    /// Resolve a station name.
    pub async fn resolve(&self, name: &str) -> Result<Station, ResolveError> {
        // Popular keys match exactly, before any normalization.
        if let Some(station) = popular_station(name) {
            return Ok(station);
        }

        let name = name.trim();

        if name.is_empty() {
            return Err(ResolveError::NotFound(String::new()));
        }

        if let Some(cached) = self.cache.get(name).await {
            debug!(query = name, hit = cached.is_some(), "station cache hit");
            return cached.ok_or_else(|| ResolveError::NotFound(name.to_string()));
        }

        let stations = self.directory.lookup(name).await.map_err(|e| {
            error!(query = name, error = %e, "station lookup failed");
            ResolveError::Lookup(e)
        })?;

        let found = first_match(&stations, name);
        self.cache.insert(name, found.clone()).await;

        found.ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}

/// First station whose title contains `query`, case-insensitively.
fn first_match(stations: &[Station], query: &str) -> Option<Station> {
    let needle = query.to_lowercase();
    stations
        .iter()
        .find(|s| s.name.to_lowercase().contains(&needle))
        .cloned()
}
