//! Per-user dialogue sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::domain::UserId;

use super::state::DialogueState;

/// A user's session slot. Holding its lock serializes that user's messages.
pub type SessionSlot = Arc<AsyncMutex<DialogueState>>;

/// All live sessions.
///
/// Sessions are transient: they live in memory only and a restart puts
/// everyone back at the main menu. A session that comes to rest (main menu or
/// cancelled) is released, so the map only holds users mid-flow.
#[derive(Default)]
pub struct Sessions {
    slots: Mutex<HashMap<UserId, SessionSlot>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot for `user`, created at the main menu on first use.
    pub fn slot(&self, user: UserId) -> SessionSlot {
        self.lock().entry(user).or_default().clone()
    }

    /// Drop `user`'s slot if it is at rest and no one else holds it.
    ///
    /// The caller must have dropped its own handle to the slot. New handles
    /// are only handed out under the map lock, so a slot seen here with a
    /// single reference cannot be picked up concurrently.
    pub fn release(&self, user: UserId) -> bool {
        let mut slots = self.lock();

        let idle = slots.get(&user).is_some_and(|slot| {
            Arc::strong_count(slot) == 1
                && slot.try_lock().is_ok_and(|state| state.is_resting())
        });

        if idle {
            slots.remove(&user);
            debug!(user = %user, live = slots.len(), "session released");
        }
        idle
    }

    /// Number of users with a session.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, SessionSlot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
