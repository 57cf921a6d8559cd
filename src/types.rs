use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Six ASCII digits, unique among live rooms
pub type RoomCode = String;

/// Zero-based position in a room's question list
pub type QuestionIndex = usize;

pub const CODE_LENGTH: usize = 6;
pub const MAX_NAME_CHARS: usize = 40;
pub const MAX_EDITION_CHARS: usize = 60;
pub const MAX_ANSWER_CHARS: usize = 80;

pub const DEFAULT_PLAYER_ONE_NAME: &str = "Player 1";
pub const DEFAULT_PLAYER_TWO_NAME: &str = "Player 2";
pub const DEFAULT_EDITION: &str = "Moyosola";

/// Prompts copied into every new room. Player One answers them truthfully,
/// Player Two tries to guess those answers.
pub const DEFAULT_QUESTIONS: &[&str] = &[
    "Your favorite color?",
    "Favorite food?",
    "Dream vacation spot?",
    "Morning or night person?",
    "Favorite music artist?",
    "Cats or dogs?",
    "Go-to comfort movie?",
    "Sweet or spicy?",
    "Ideal weekend activity?",
    "One word that describes you?",
];

pub fn default_questions() -> Vec<String> {
    DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Player One is answering; accepts `submit_answer`
    #[serde(alias = "p1_answer")]
    Answering,
    /// Player Two is guessing; accepts `submit_guess`
    #[serde(alias = "p2_guess")]
    Guessing,
    Done,
}

/// Player One's stored answers keyed by question index.
///
/// Serialized as a JSON object with stringified indices (`{"0": "Blue"}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Answers(BTreeMap<QuestionIndex, String>);

impl Answers {
    pub fn get(&self, index: QuestionIndex) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = QuestionIndex> + '_ {
        self.0.keys().copied()
    }

    /// Overwrites whatever was stored at `index`. Callers bound-check first.
    pub(crate) fn insert(&mut self, index: QuestionIndex, text: String) {
        self.0.insert(index, text);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerOne {
    pub name: String,
    #[serde(default)]
    pub answers: Answers,
    #[serde(default)]
    pub ready: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerTwo {
    /// None until someone joins; set at most once
    pub name: Option<String>,
    #[serde(default)]
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: RoomCode,
    pub edition: String,
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
    pub owner_name: String,
    #[serde(alias = "p1")]
    pub player1: PlayerOne,
    #[serde(alias = "p2")]
    pub player2: PlayerTwo,
    pub questions: Vec<String>,
    pub phase: Phase,
    pub current_index: QuestionIndex,
    pub score: u32,
    pub max_score: u32,
}

/// The full persisted room set, keyed by room code
pub type Rooms = std::collections::HashMap<RoomCode, Room>;

/// Accepts RFC 3339 strings as well as fractional unix seconds, which is how
/// older room documents recorded creation time.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Rfc3339(DateTime<Utc>),
        UnixSeconds(f64),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Rfc3339(ts) => Ok(ts),
        RawTimestamp::UnixSeconds(secs) => DateTime::from_timestamp_millis((secs * 1000.0) as i64)
            .ok_or_else(|| D::Error::custom(format!("timestamp {} out of range", secs))),
    }
}
