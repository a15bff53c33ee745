//! HTTP adapter for the dialogue.
//!
//! Exposes the per-message dialogue function as `POST /messages`, plus a
//! read-only view of saved routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
