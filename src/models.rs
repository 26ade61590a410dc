//! Joke records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the id prefix shown on the board
pub const SHORT_ID_LEN: usize = 8;

/// A joke kept on the board.
///
/// Serialized as `{"id": "...", "text": "...", "votes": 0}`; the stored
/// snapshot is a JSON array of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    /// Assigned when the joke is accepted, stable afterwards
    pub id: Uuid,
    /// Joke body, also the deduplication key
    pub text: String,
    /// Net votes, may go negative
    pub votes: i64,
}

impl Joke {
    /// Create a freshly accepted joke with a new id and no votes
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            votes: 0,
        }
    }

    /// First block of the id, enough to tell jokes apart on screen
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..SHORT_ID_LEN].to_string()
    }
}

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn delta(self) -> i64 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}
