//! The favorite-route store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{error, info};

use crate::domain::{Route, Station, UserId};

use super::error::RouteError;
use super::files::RouteFiles;

/// Default per-user route limit.
pub const DEFAULT_MAX_ROUTES: usize = 10;

/// Longest accepted route name, in characters.
pub const MAX_NAME_CHARS: usize = 64;

/// Configuration for the route store.
#[derive(Debug, Clone)]
pub struct RouteStoreConfig {
    /// Directory holding one JSON file per user.
    pub dir: PathBuf,
    /// Maximum routes per user.
    pub max_routes: usize,
}

impl RouteStoreConfig {
    /// Create a new config with the given directory and default limit.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_routes: DEFAULT_MAX_ROUTES,
        }
    }

    /// Set the per-user route limit.
    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = max_routes;
        self
    }
}

/// Per-user favorite routes, shared by all sessions.
///
/// One lock guards the whole map. Every mutation is written through to disk
/// while the lock is held, so files are written in mutation order. A failed
/// write is logged and the in-memory change stands.
pub struct RouteStore {
    routes: Mutex<HashMap<UserId, Vec<Route>>>,
    files: RouteFiles,
    max_routes: usize,
}

impl RouteStore {
    /// Open the store, loading whatever routes are on disk.
    pub fn open(config: RouteStoreConfig) -> Self {
        let files = RouteFiles::new(config.dir);
        let routes = files.load_all();

        Self {
            routes: Mutex::new(routes),
            files,
            max_routes: config.max_routes,
        }
    }

    /// Per-user route limit.
    pub fn max_routes(&self) -> usize {
        self.max_routes
    }

    /// A user's routes in insertion order. Unknown users have none.
    pub fn list(&self, user: UserId) -> Vec<Route> {
        self.lock().get(&user).cloned().unwrap_or_default()
    }

    /// Number of routes a user has saved.
    pub fn count(&self, user: UserId) -> usize {
        self.lock().get(&user).map_or(0, Vec::len)
    }

    /// Whether the user can save another route.
    pub fn has_room(&self, user: UserId) -> bool {
        self.count(user) < self.max_routes
    }

    /// Number of users with at least one route.
    pub fn user_count(&self) -> usize {
        self.lock().len()
    }

    /// Save a new route for a user.
    ///
    /// Rejected without mutation if the name is blank or too long, the
    /// user already has a route for this origin/destination pair (whatever
    /// its name), or the user is at the limit.
    pub fn add(
        &self,
        user: UserId,
        name: &str,
        origin: Station,
        destination: Station,
    ) -> Result<Route, RouteError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RouteError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(RouteError::NameTooLong {
                max: MAX_NAME_CHARS,
            });
        }

        let mut all = self.lock();
        let existing: &[Route] = all.get(&user).map(Vec::as_slice).unwrap_or_default();

        if let Some(dup) = existing
            .iter()
            .find(|r| r.same_pair(&origin.id, &destination.id))
        {
            return Err(RouteError::DuplicatePair {
                existing: dup.name.clone(),
            });
        }

        if existing.len() >= self.max_routes {
            return Err(RouteError::CapacityExceeded {
                limit: self.max_routes,
            });
        }

        let route = Route {
            user_id: user,
            name: name.to_string(),
            origin,
            destination,
            created_at: Utc::now(),
        };
        let routes = all.entry(user).or_default();
        routes.push(route.clone());

        info!(user = %user, name = %route.name, count = routes.len(), "route saved");
        self.persist(user, routes);

        Ok(route)
    }

    /// Delete the route at `index` in the user's list.
    ///
    /// Removing a user's last route removes the user entirely.
    pub fn delete(&self, user: UserId, index: usize) -> Result<Route, RouteError> {
        let mut all = self.lock();

        let Some(routes) = all.get_mut(&user) else {
            return Err(RouteError::IndexOutOfRange { index, len: 0 });
        };

        if index >= routes.len() {
            return Err(RouteError::IndexOutOfRange {
                index,
                len: routes.len(),
            });
        }

        let removed = routes.remove(index);
        info!(user = %user, name = %removed.name, remaining = routes.len(), "route deleted");

        if routes.is_empty() {
            all.remove(&user);
            if let Err(e) = self.files.remove(user) {
                error!(user = %user, error = %e, "failed to remove route file");
            }
        } else {
            self.persist(user, routes);
        }

        Ok(removed)
    }

    fn persist(&self, user: UserId, routes: &[Route]) {
        if let Err(e) = self.files.save(user, routes) {
            error!(user = %user, error = %e, "failed to persist routes, keeping in-memory copy");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, Vec<Route>>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;
    use tempfile::{TempDir, tempdir};

    fn station(id: &str) -> Station {
        Station::new(StationId::parse(id).unwrap(), format!("Station {id}"))
    }

    fn open() -> (TempDir, RouteStore) {
        let dir = tempdir().unwrap();
        let store = RouteStore::open(RouteStoreConfig::new(dir.path()));
        (dir, store)
    }

    #[test]
    fn default_config() {
        let config = RouteStoreConfig::new("routes");
        assert_eq!(config.max_routes, 10);
        assert_eq!(config.with_max_routes(3).max_routes, 3);
    }

    #[test]
    fn unknown_user_lists_empty() {
        let (_dir, store) = open();
        assert!(store.list(UserId(1)).is_empty());
        assert_eq!(store.count(UserId(1)), 0);
        assert!(store.has_room(UserId(1)));
    }

    #[test]
    fn add_appends_in_order() {
        let (_dir, store) = open();
        store.add(UserId(1), "A", station("s1"), station("s2")).unwrap();
        store.add(UserId(1), "B", station("s2"), station("s1")).unwrap();

        let names: Vec<String> = store.list(UserId(1)).into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn duplicate_pair_rejected_regardless_of_name() {
        let (_dir, store) = open();
        store.add(UserId(1), "Home-Work", station("s1"), station("s2")).unwrap();

        let err = store
            .add(UserId(1), "Other name", station("s1"), station("s2"))
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicatePair {
                existing: "Home-Work".into()
            }
        );
        assert_eq!(store.count(UserId(1)), 1);
    }

    #[test]
    fn same_name_different_pair_allowed() {
        let (_dir, store) = open();
        store.add(UserId(1), "Same", station("s1"), station("s2")).unwrap();
        store.add(UserId(1), "Same", station("s1"), station("s3")).unwrap();
        assert_eq!(store.count(UserId(1)), 2);
    }

    #[test]
    fn pairs_are_per_user() {
        let (_dir, store) = open();
        store.add(UserId(1), "A", station("s1"), station("s2")).unwrap();
        store.add(UserId(2), "A", station("s1"), station("s2")).unwrap();
        assert_eq!(store.user_count(), 2);
    }

    #[test]
    fn eleventh_route_rejected() {
        let (_dir, store) = open();
        for i in 0..10 {
            store
                .add(UserId(1), &format!("r{i}"), station("s0"), station(&format!("s{}", i + 1)))
                .unwrap();
        }
        assert!(!store.has_room(UserId(1)));

        let before = store.list(UserId(1));
        let err = store
            .add(UserId(1), "r10", station("s0"), station("s99"))
            .unwrap_err();

        assert_eq!(err, RouteError::CapacityExceeded { limit: 10 });
        assert_eq!(store.list(UserId(1)), before);
        assert_eq!(store.count(UserId(1)), 10);
    }

    #[test]
    fn blank_and_long_names_rejected() {
        let (_dir, store) = open();
        assert_eq!(
            store.add(UserId(1), "   ", station("s1"), station("s2")),
            Err(RouteError::EmptyName)
        );
        let long = "я".repeat(MAX_NAME_CHARS + 1);
        assert_eq!(
            store.add(UserId(1), &long, station("s1"), station("s2")),
            Err(RouteError::NameTooLong { max: MAX_NAME_CHARS })
        );
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn names_are_trimmed() {
        let (_dir, store) = open();
        let route = store
            .add(UserId(1), "  Home-Work \n", station("s1"), station("s2"))
            .unwrap();
        assert_eq!(route.name, "Home-Work");
    }

    #[test]
    fn rejected_first_add_leaves_no_residue() {
        let dir = tempdir().unwrap();
        let store = RouteStore::open(RouteStoreConfig::new(dir.path()).with_max_routes(0));

        let err = store.add(UserId(1), "A", station("s1"), station("s2")).unwrap_err();
        assert_eq!(err, RouteError::CapacityExceeded { limit: 0 });
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn delete_by_position() {
        let (_dir, store) = open();
        store.add(UserId(1), "A", station("s1"), station("s2")).unwrap();
        store.add(UserId(1), "B", station("s1"), station("s3")).unwrap();
        store.add(UserId(1), "C", station("s1"), station("s4")).unwrap();

        let removed = store.delete(UserId(1), 1).unwrap();
        assert_eq!(removed.name, "B");

        let names: Vec<String> = store.list(UserId(1)).into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn delete_out_of_range() {
        let (_dir, store) = open();
        assert_eq!(
            store.delete(UserId(1), 0),
            Err(RouteError::IndexOutOfRange { index: 0, len: 0 })
        );

        store.add(UserId(1), "A", station("s1"), station("s2")).unwrap();
        assert_eq!(
            store.delete(UserId(1), 1),
            Err(RouteError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(store.count(UserId(1)), 1);
    }

    #[test]
    fn deleting_last_route_removes_user() {
        let (dir, store) = open();
        store.add(UserId(1), "A", station("s1"), station("s2")).unwrap();
        assert!(dir.path().join("1.json").exists());

        store.delete(UserId(1), 0).unwrap();

        assert_eq!(store.user_count(), 0);
        assert!(store.list(UserId(1)).is_empty());
        assert!(!dir.path().join("1.json").exists());
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RouteStore::open(RouteStoreConfig::new(dir.path()));
            store.add(UserId(1), "A", station("s1"), station("s2")).unwrap();
            store.add(UserId(1), "B", station("s2"), station("s1")).unwrap();
            store.add(UserId(2), "C", station("s3"), station("s4")).unwrap();
            store.delete(UserId(1), 0).unwrap();
        }

        let reopened = RouteStore::open(RouteStoreConfig::new(dir.path()));
        let names: Vec<String> = reopened.list(UserId(1)).into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["B"]);
        assert_eq!(reopened.count(UserId(2)), 1);
    }

    #[test]
    fn write_failure_keeps_memory() {
        // A regular file where the directory should be makes every write fail.
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("routes");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = RouteStore::open(RouteStoreConfig::new(&blocker));
        let route = store.add(UserId(1), "A", station("s1"), station("s2"));

        assert!(route.is_ok());
        assert_eq!(store.count(UserId(1)), 1);
    }
}
