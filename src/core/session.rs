//! In-memory session store.
//!
//! A [`Session`] pairs the correlation id sent to the webhook with the
//! transcript shown to the user. The id is fixed at construction and the
//! transcript only grows; there is no API for editing or removing turns.

use uuid::Uuid;

use crate::core::message::Turn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    transcript: Vec<Turn>,
}

impl Session {
    /// Create a session with a fresh UUID v4 id and an empty transcript.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.transcript.last()
    }

    /// Return this session with `turn` appended.
    pub fn append_turn(mut self, turn: Turn) -> Self {
        self.push_turn(turn);
        self
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
