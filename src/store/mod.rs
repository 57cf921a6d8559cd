mod file;
mod memory;

use crate::types::Rooms;
use async_trait::async_trait;
use std::path::PathBuf;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Result type for store writes
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while persisting the room set
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize rooms: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Whole-set persistence for rooms.
///
/// Backends never hand out partial updates: callers load everything, change
/// one room and write everything back. Serialization of those cycles is the
/// caller's job (see [`crate::state::AppState`]).
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Load the last successfully saved room set.
    ///
    /// Missing or unreadable data yields an empty set instead of an error;
    /// nothing readable was ever committed in that case.
    async fn load_all(&self) -> Rooms;

    /// Replace the stored set. Readers must never observe a half-written set.
    async fn save_all(&self, rooms: &Rooms) -> StoreResult<()>;

    /// Name of this backend, for logging
    fn name(&self) -> &str;
}
