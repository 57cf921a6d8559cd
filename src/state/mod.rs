mod lobby;
mod round;

use crate::room::{RoomError, RoomResult};
use crate::store::RoomStore;
use crate::types::*;
use tokio::sync::Mutex;

/// Shared application state.
///
/// Every command runs its whole load -> mutate -> save cycle while holding the
/// single store lock, so no two commands interleave, even across rooms.
pub struct AppState {
    store: Mutex<Box<dyn RoomStore>>,
    /// Copied into each new room at creation time
    questions: Vec<String>,
    default_edition: String,
}

impl AppState {
    pub fn new(store: impl RoomStore + 'static) -> Self {
        Self {
            store: Mutex::new(Box::new(store)),
            questions: default_questions(),
            default_edition: DEFAULT_EDITION.to_string(),
        }
    }

    /// Replace the question set used for rooms created from now on
    pub fn with_questions(mut self, questions: Vec<String>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_default_edition(mut self, edition: impl Into<String>) -> Self {
        self.default_edition = edition.into();
        self
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Apply `apply` to the room with `code` inside the critical section.
    ///
    /// `apply` returns whether it changed the room; unchanged rooms are not
    /// written back. Returns the room as it stands afterwards.
    async fn update_room<F>(&self, code: &str, apply: F) -> RoomResult<Room>
    where
        F: FnOnce(&mut Room) -> RoomResult<bool>,
    {
        let code = code.trim();
        let store = self.store.lock().await;
        let mut rooms = store.load_all().await;

        let room = rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::RoomNotFound(code.to_string()))?;
        room.validate()
            .map_err(|reason| RoomError::CorruptRoom {
                code: code.to_string(),
                reason,
            })?;

        let changed = apply(room)?;
        let snapshot = room.clone();

        if changed {
            store.save_all(&rooms).await?;
        }
        Ok(snapshot)
    }
}
