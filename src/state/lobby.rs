use super::AppState;
use crate::room::{RoomError, RoomResult};
use crate::types::*;
use rand::Rng;

/// Generate a random numeric room code (6 digits, leading zeros allowed)
fn generate_room_code() -> RoomCode {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

impl AppState {
    /// Open a new room for Player One
    pub async fn create_room(
        &self,
        owner_name: Option<&str>,
        edition: Option<&str>,
    ) -> RoomResult<Room> {
        let store = self.store.lock().await;
        let mut rooms = store.load_all().await;

        let code = loop {
            let code = generate_room_code();
            if !rooms.contains_key(&code) {
                break code;
            }
            // Collision - try again (1M codes, handful of live rooms)
        };

        let room = Room::new(
            code.clone(),
            owner_name,
            edition,
            &self.default_edition,
            &self.questions,
            chrono::Utc::now(),
        );
        rooms.insert(code.clone(), room.clone());
        store.save_all(&rooms).await?;

        tracing::info!(
            "Room {} created by {} ({} questions)",
            code,
            room.owner_name,
            room.question_count()
        );
        Ok(room)
    }

    /// Seat Player Two. Joining an occupied room is a no-op.
    pub async fn join_room(&self, code: &str, name: Option<&str>) -> RoomResult<Room> {
        self.update_room(code, |room| {
            let joined = room.join(name);
            if joined {
                tracing::info!(
                    "{} joined room {}",
                    room.player2.name.as_deref().unwrap_or_default(),
                    room.code
                );
            }
            Ok(joined)
        })
        .await
    }

    /// Current snapshot of a room
    pub async fn get_state(&self, code: &str) -> RoomResult<Room> {
        let code = code.trim();
        let store = self.store.lock().await;
        store
            .load_all()
            .await
            .remove(code)
            .ok_or_else(|| RoomError::RoomNotFound(code.to_string()))
    }
}
