use super::AppState;
use crate::room::RoomResult;
use crate::types::*;

impl AppState {
    /// Record Player One's answer for the current question
    pub async fn submit_answer(&self, code: &str, answer: Option<&str>) -> RoomResult<Room> {
        self.update_room(code, |room| {
            room.submit_answer(answer)?;
            if room.phase == Phase::Guessing {
                tracing::info!("Room {} finished answering, guessing starts", room.code);
            }
            Ok(true)
        })
        .await
    }

    /// Score Player Two's guess for the current question
    pub async fn submit_guess(&self, code: &str, guess: Option<&str>) -> RoomResult<Room> {
        self.update_room(code, |room| {
            let index = room.current_index;
            let matched = room.submit_guess(guess)?;
            tracing::debug!(
                "Room {} guess for question {}: {}",
                room.code,
                index,
                if matched { "match" } else { "miss" }
            );
            if room.phase == Phase::Done {
                tracing::info!(
                    "Room {} finished with score {}/{}",
                    room.code,
                    room.score,
                    room.max_score
                );
            }
            Ok(true)
        })
        .await
    }

    /// Restart the guessing round, keeping Player One's answers
    pub async fn reset_round(&self, code: &str) -> RoomResult<Room> {
        self.update_room(code, |room| {
            if room.phase == Phase::Answering {
                tracing::warn!(
                    "Room {} reset while still answering; unanswered questions cannot score",
                    room.code
                );
            }
            room.reset_round();
            Ok(true)
        })
        .await
    }
}
