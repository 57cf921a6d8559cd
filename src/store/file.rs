use super::{RoomStore, StoreError, StoreResult};
use crate::types::{Room, Rooms};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Rooms kept as one pretty-printed JSON document on disk.
///
/// Writes go to `<path>.tmp` first and are renamed over the real file, so a
/// crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl RoomStore for FileStore {
    async fn load_all(&self) -> Rooms {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Rooms::new(),
            Err(e) => {
                tracing::warn!(
                    "Failed to read {}: {}. Treating room set as empty.",
                    self.path.display(),
                    e
                );
                return Rooms::new();
            }
        };

        let raw = match serde_json::from_slice::<HashMap<String, serde_json::Value>>(&bytes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    "Room document {} is corrupt: {}. Treating room set as empty.",
                    self.path.display(),
                    e
                );
                return Rooms::new();
            }
        };

        // Decode rooms one by one so a single bad record can't take the
        // rest of the set down with it.
        raw.into_iter()
            .filter_map(|(code, value)| match serde_json::from_value::<Room>(value) {
                Ok(room) => Some((code, room)),
                Err(e) => {
                    tracing::warn!(
                        "Skipping unreadable room {} in {}: {}",
                        code,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect()
    }

    async fn save_all(&self, rooms: &Rooms) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::io_error(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(rooms)?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| Self::io_error(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| Self::io_error(&self.path, e))?;

        tracing::debug!("Saved {} rooms to {}", rooms.len(), self.path.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{default_questions, DEFAULT_EDITION};
    use tempfile::TempDir;

    fn sample_rooms() -> Rooms {
        let mut rooms = Rooms::new();
        for code in ["123456", "654321"] {
            let mut room = Room::new(
                code.to_string(),
                Some("Alice"),
                Some("Summer"),
                DEFAULT_EDITION,
                &default_questions(),
                chrono::Utc::now(),
            );
            room.submit_answer(Some("Green")).unwrap();
            room.join(Some("Bob"));
            rooms.insert(code.to_string(), room);
        }
        rooms
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("rooms.json"));

        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("rooms.json"));
        let rooms = sample_rooms();

        store.save_all(&rooms).await.unwrap();
        let loaded = store.load_all().await;

        assert_eq!(loaded, rooms);
    }

    #[tokio::test]
    async fn test_save_creates_parent_dir_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("data").join("rooms.json");
        let store = FileStore::new(&path);

        store.save_all(&sample_rooms()).await.unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_document_loads_as_empty() {
        // Lenient recovery: garbage on disk degrades to an empty set rather
        // than failing every request.
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rooms.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_room_is_skipped_and_others_survive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rooms.json");
        let store = FileStore::new(&path);
        let rooms = sample_rooms();
        store.save_all(&rooms).await.unwrap();

        // Splice in a record without an owner name
        let mut doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        let mut broken = doc["123456"].clone();
        broken["code"] = "999999".into();
        broken.as_object_mut().unwrap().remove("ownerName");
        doc["999999"] = broken;
        std::fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();

        let mut loaded = store.load_all().await;
        assert_eq!(loaded, rooms);
        assert!(!loaded.contains_key("999999"));

        // Writing the set back keeps every good room
        let extra = Room::new(
            "777777".to_string(),
            None,
            None,
            DEFAULT_EDITION,
            &default_questions(),
            chrono::Utc::now(),
        );
        loaded.insert(extra.code.clone(), extra);
        store.save_all(&loaded).await.unwrap();

        let reloaded = store.load_all().await;
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.get("123456"), rooms.get("123456"));
        assert_eq!(reloaded.get("654321"), rooms.get("654321"));
    }

    #[tokio::test]
    async fn test_unreadable_path_loads_as_empty() {
        // The document path exists but is a directory, so reading it fails
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rooms.json");
        std::fs::create_dir(&path).unwrap();

        let store = FileStore::new(&path);
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_document() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("rooms.json"));

        store.save_all(&sample_rooms()).await.unwrap();
        store.save_all(&Rooms::new()).await.unwrap();

        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_loads_legacy_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rooms.json");
        let legacy = r#"{
          "482913": {
            "code": "482913",
            "edition": "Moyosola",
            "createdAt": 1718000000.25,
            "ownerName": "Ada",
            "p1": {"name": "Ada", "answers": {"0": "Blue", "1": "Rice"}, "ready": true},
            "p2": {"name": null, "ready": false},
            "questions": ["Your favorite color?", "Favorite food?"],
            "phase": "p2_guess",
            "currentIndex": 0,
            "score": 0,
            "maxScore": 2
          }
        }"#;
        std::fs::write(&path, legacy).unwrap();

        let rooms = FileStore::new(&path).load_all().await;
        let room = rooms.get("482913").expect("legacy room should load");

        assert_eq!(room.phase, crate::types::Phase::Guessing);
        assert_eq!(room.player1.answers.get(1), Some("Rice"));
        assert!(room.player2.name.is_none());
        assert_eq!(room.created_at.timestamp(), 1718000000);
        assert!(room.validate().is_ok());
    }

    #[tokio::test]
    async fn test_save_into_unwritable_location_fails() {
        let temp = TempDir::new().unwrap();
        // A regular file where a directory is expected
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let store = FileStore::new(blocker.join("rooms.json"));

        let result = store.save_all(&sample_rooms()).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
