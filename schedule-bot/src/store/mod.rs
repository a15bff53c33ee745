//! Durable per-user favorite routes.

mod error;
mod files;
mod routes;

pub use error::{PersistError, RouteError};
pub use files::RouteFiles;
pub use routes::{DEFAULT_MAX_ROUTES, MAX_NAME_CHARS, RouteStore, RouteStoreConfig};
