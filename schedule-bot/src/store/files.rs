//! On-disk layout for saved routes.
//!
//! One JSON file per user, `<dir>/<user_id>.json`. Files are replaced
//! atomically (write to a temporary sibling, then rename), so a crash leaves
//! either the old record or the new one.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::{Route, UserId};

use super::error::PersistError;

/// A user's record as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    user_id: UserId,
    routes: Vec<Route>,
}

/// Per-user route files under one directory.
#[derive(Debug, Clone)]
pub struct RouteFiles {
    dir: PathBuf,
}

impl RouteFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, user: UserId) -> PathBuf {
        self.dir.join(format!("{}.json", user.0))
    }

    /// Load every user's routes.
    ///
    /// Never fails: a missing directory is a first run, and an unreadable or
    /// corrupt file is logged and that user starts with no routes.
    pub fn load_all(&self) -> HashMap<UserId, Vec<Route>> {
        let mut all = HashMap::new();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(dir = %self.dir.display(), "no route directory yet, starting empty");
                return all;
            }
            Err(e) => {
                error!(dir = %self.dir.display(), error = %e, "cannot read route directory, starting empty");
                return all;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match read_record(&path) {
                Ok(record) if record.routes.is_empty() => {}
                Ok(record) => {
                    let routes = dedup_pairs(record.user_id, record.routes);
                    all.insert(record.user_id, routes);
                }
                Err(message) => {
                    error!(path = %path.display(), error = %message, "skipping unreadable route file");
                }
            }
        }

        info!(users = all.len(), "loaded saved routes");
        all
    }

    /// Write a user's full route list, replacing the previous record.
    pub fn save(&self, user: UserId, routes: &[Route]) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let record = UserRecord {
            user_id: user,
            routes: routes.to_vec(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        let path = self.path_for(user);
        let tmp = path.with_extension("json.tmp");

        std::fs::write(&tmp, json).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| PersistError::Io { path, source })?;

        Ok(())
    }

    /// Delete a user's record. A record that is already gone is fine.
    pub fn remove(&self, user: UserId) -> Result<(), PersistError> {
        let path = self.path_for(user);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }
}

fn read_record(path: &Path) -> Result<UserRecord, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let record: UserRecord = serde_json::from_str(&contents).map_err(|e| e.to_string())?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if stem != record.user_id.0.to_string() {
        return Err(format!(
            "file name does not match user id {}",
            record.user_id
        ));
    }

    Ok(record)
}

/// Keep the first route for each station pair.
fn dedup_pairs(user: UserId, routes: Vec<Route>) -> Vec<Route> {
    let before = routes.len();
    let mut seen = HashSet::new();
    let routes: Vec<Route> = routes
        .into_iter()
        .filter(|r| seen.insert((r.origin.id.clone(), r.destination.id.clone())))
        .collect();

    if routes.len() != before {
        warn!(user = %user, dropped = before - routes.len(), "dropped duplicate routes on load");
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Station, StationId};
    use chrono::DateTime;
    use tempfile::tempdir;

    fn route(user: i64, name: &str, origin: &str, destination: &str) -> Route {
        Route {
            user_id: UserId(user),
            name: name.to_string(),
            origin: Station::new(StationId::parse(origin).unwrap(), "A"),
            destination: Station::new(StationId::parse(destination).unwrap(), "B"),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let files = RouteFiles::new(dir.path());

        let routes = vec![route(7, "Home-Work", "s1", "s2"), route(7, "Back", "s2", "s1")];
        files.save(UserId(7), &routes).unwrap();
        files.save(UserId(8), &[route(8, "X", "s3", "s4")]).unwrap();

        let loaded = files.load_all();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&UserId(7)], routes);
        assert_eq!(loaded[&UserId(8)][0].name, "X");
    }

    #[test]
    fn missing_directory_is_empty() {
        let files = RouteFiles::new("/nonexistent/path/routes");
        assert!(files.load_all().is_empty());
    }

    #[test]
    fn corrupt_file_is_skipped() {
        let dir = tempdir().unwrap();
        let files = RouteFiles::new(dir.path());
        files.save(UserId(1), &[route(1, "ok", "s1", "s2")]).unwrap();
        std::fs::write(dir.path().join("2.json"), "{ not json").unwrap();

        let loaded = files.load_all();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key(&UserId(1)));
    }

    #[test]
    fn mismatched_file_name_is_skipped() {
        let dir = tempdir().unwrap();
        let files = RouteFiles::new(dir.path());
        files.save(UserId(1), &[route(1, "ok", "s1", "s2")]).unwrap();
        std::fs::rename(dir.path().join("1.json"), dir.path().join("99.json")).unwrap();

        assert!(files.load_all().is_empty());
    }

    #[test]
    fn leftover_temp_file_is_ignored() {
        let dir = tempdir().unwrap();
        let files = RouteFiles::new(dir.path());
        std::fs::write(dir.path().join("5.json.tmp"), "{ half written").unwrap();

        assert!(files.load_all().is_empty());
    }

    #[test]
    fn duplicates_dropped_on_load() {
        let dir = tempdir().unwrap();
        let files = RouteFiles::new(dir.path());
        files
            .save(
                UserId(3),
                &[route(3, "first", "s1", "s2"), route(3, "again", "s1", "s2")],
            )
            .unwrap();

        let loaded = files.load_all();
        assert_eq!(loaded[&UserId(3)].len(), 1);
        assert_eq!(loaded[&UserId(3)][0].name, "first");
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let files = RouteFiles::new(dir.path());
        files.save(UserId(4), &[route(4, "r", "s1", "s2")]).unwrap();

        files.remove(UserId(4)).unwrap();
        files.remove(UserId(4)).unwrap();
        assert!(!dir.path().join("4.json").exists());
    }

    #[test]
    fn creates_directory_on_save() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("routes");
        let files = RouteFiles::new(&nested);

        files.save(UserId(1), &[route(1, "r", "s1", "s2")]).unwrap();
        assert!(nested.join("1.json").exists());
    }
}
