use super::{RoomStore, StoreResult};
use crate::types::Rooms;
use async_trait::async_trait;
use std::sync::Mutex;

/// Non-durable store for tests and throwaway servers
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: Mutex<Rooms>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing room set
    pub fn with_rooms(rooms: Rooms) -> Self {
        Self {
            rooms: Mutex::new(rooms),
        }
    }

    /// Copy of whatever was last saved
    pub fn snapshot(&self) -> Rooms {
        self.rooms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn load_all(&self) -> Rooms {
        self.snapshot()
    }

    async fn save_all(&self, rooms: &Rooms) -> StoreResult<()> {
        *self
            .rooms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = rooms.clone();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
