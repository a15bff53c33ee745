//! Application state for the web layer.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::dialogue::Dialogue;

/// Shared application state.
pub struct AppState<D, S> {
    /// The dialogue, which owns the sessions and the route store
    pub dialogue: Arc<Dialogue<D, S>>,

    /// Offset in which "now" is taken for schedule lookups
    pub utc_offset: FixedOffset,
}

impl<D, S> AppState<D, S> {
    /// Create a new app state.
    pub fn new(dialogue: Dialogue<D, S>, utc_offset: FixedOffset) -> Self {
        Self {
            dialogue: Arc::new(dialogue),
            utc_offset,
        }
    }

    /// The current time in the configured offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.utc_offset)
    }
}

// Derived `Clone` would require `D: Clone` and `S: Clone`.
impl<D, S> Clone for AppState<D, S> {
    fn clone(&self) -> Self {
        Self {
            dialogue: Arc::clone(&self.dialogue),
            utc_offset: self.utc_offset,
        }
    }
}
