//! Room state machine.
//!
//! Pure transitions on a single [`Room`]: no I/O, no locking. The
//! coordinator in [`crate::state`] loads a room, calls one of these, and
//! persists the result.
//!
//! Phase flow: `Answering -> Guessing -> Done`, with `reset_round` jumping
//! back to `Guessing` from anywhere.

use crate::store::StoreError;
use crate::types::*;
use chrono::{DateTime, Utc};

/// Result type for room commands
pub type RoomResult<T> = Result<T, RoomError>;

/// Errors a room command can fail with
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound(RoomCode),

    #[error("Room is in {actual:?} phase, expected {expected:?}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("Room {code} is corrupt: {reason}")]
    CorruptRoom { code: RoomCode, reason: String },

    #[error("Failed to persist rooms: {0}")]
    Persistence(#[from] StoreError),
}

/// Trim `input` and cap it at `max_chars` characters. Blank input yields an
/// empty string.
pub fn clean_text(input: Option<&str>, max_chars: usize) -> String {
    input
        .unwrap_or_default()
        .trim()
        .chars()
        .take(max_chars)
        .collect()
}

/// Like [`clean_text`], but substitutes `default` when the result is blank.
pub fn clean_name(input: Option<&str>, default: &str, max_chars: usize) -> String {
    let cleaned = clean_text(input, max_chars);
    if cleaned.is_empty() {
        default.to_string()
    } else {
        cleaned
    }
}

/// Case-insensitive, whitespace-insensitive comparison used for scoring.
/// An empty stored answer never matches.
pub fn is_match(stored: &str, guess: &str) -> bool {
    let stored = stored.trim().to_lowercase();
    !stored.is_empty() && stored == guess.trim().to_lowercase()
}

impl Room {
    /// Build a fresh room in the answering phase.
    ///
    /// `questions` is copied so later changes to the configured set never
    /// reach existing rooms. With no questions there is nothing to answer and
    /// the room starts out `Done`.
    pub fn new(
        code: RoomCode,
        owner_name: Option<&str>,
        edition: Option<&str>,
        default_edition: &str,
        questions: &[String],
        created_at: DateTime<Utc>,
    ) -> Self {
        let owner = clean_name(owner_name, DEFAULT_PLAYER_ONE_NAME, MAX_NAME_CHARS);
        let phase = if questions.is_empty() {
            Phase::Done
        } else {
            Phase::Answering
        };

        Self {
            code,
            edition: clean_name(edition, default_edition, MAX_EDITION_CHARS),
            created_at,
            owner_name: owner.clone(),
            player1: PlayerOne {
                name: owner,
                answers: Answers::default(),
                ready: false,
            },
            player2: PlayerTwo::default(),
            questions: questions.to_vec(),
            phase,
            current_index: 0,
            score: 0,
            max_score: questions.len() as u32,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    fn is_last_index(&self) -> bool {
        self.current_index + 1 >= self.question_count()
    }

    fn require_phase(&self, expected: Phase) -> RoomResult<()> {
        if self.phase != expected {
            return Err(RoomError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Seat Player Two. Returns whether the room changed; the first join wins
    /// and later joins leave the name untouched.
    pub fn join(&mut self, name: Option<&str>) -> bool {
        if self.player2.name.is_some() {
            return false;
        }
        self.player2.name = Some(clean_name(
            name,
            DEFAULT_PLAYER_TWO_NAME,
            MAX_NAME_CHARS,
        ));
        true
    }

    /// Store Player One's answer for the current question and advance.
    ///
    /// Resubmitting before the cursor moves overwrites; there is no way to go
    /// back to an earlier question.
    pub fn submit_answer(&mut self, answer: Option<&str>) -> RoomResult<()> {
        self.require_phase(Phase::Answering)?;

        let answer = clean_text(answer, MAX_ANSWER_CHARS);
        self.player1.answers.insert(self.current_index, answer);

        if self.is_last_index() {
            self.phase = Phase::Guessing;
            self.current_index = 0;
            self.player1.ready = true;
        } else {
            self.current_index += 1;
        }
        Ok(())
    }

    /// Score Player Two's guess for the current question and advance.
    /// Returns whether the guess matched.
    pub fn submit_guess(&mut self, guess: Option<&str>) -> RoomResult<bool> {
        self.require_phase(Phase::Guessing)?;

        let guess = clean_text(guess, MAX_ANSWER_CHARS);
        let stored = self
            .player1
            .answers
            .get(self.current_index)
            .unwrap_or_default();
        let matched = is_match(stored, &guess);
        if matched && self.score < self.max_score {
            self.score += 1;
        }

        if self.is_last_index() {
            self.phase = Phase::Done;
        } else {
            self.current_index += 1;
        }
        Ok(matched)
    }

    /// Replay the guessing round against the same stored answers.
    ///
    /// Allowed from every phase, including `Answering`, where it skips the
    /// remaining questions. A room without questions stays `Done`.
    pub fn reset_round(&mut self) {
        if self.questions.is_empty() {
            self.score = 0;
            return;
        }
        self.phase = Phase::Guessing;
        self.current_index = 0;
        self.score = 0;
    }

    /// Check the structural invariants a room must satisfy between commands.
    pub fn validate(&self) -> Result<(), String> {
        let len = self.question_count();

        if self.code.len() != CODE_LENGTH || !self.code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("code '{}' is not {} digits", self.code, CODE_LENGTH));
        }

        if self.phase != Phase::Done && self.current_index >= len {
            return Err(format!(
                "current index {} out of range for {} questions",
                self.current_index, len
            ));
        }

        if self.max_score as usize != len {
            return Err(format!(
                "max score {} does not match {} questions",
                self.max_score, len
            ));
        }

        if self.score > self.max_score {
            return Err(format!(
                "score {} exceeds max score {}",
                self.score, self.max_score
            ));
        }

        if let Some(index) = self.player1.answers.indices().find(|i| *i >= len) {
            return Err(format!("answer stored for unknown question {}", index));
        }

        Ok(())
    }
}
