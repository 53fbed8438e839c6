use std::error::Error;
use std::fmt;

use crate::core::message::{GatewayResult, Turn};
use crate::core::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    /// The submitted text was empty or whitespace only.
    EmptyMessage,
    /// A user turn is still waiting for its reply.
    ReplyPending,
    /// A reply arrived while no user turn was outstanding.
    NoPendingTurn,
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::EmptyMessage => write!(f, "Message is empty"),
            TurnError::ReplyPending => write!(f, "Still waiting for the previous reply"),
            TurnError::NoPendingTurn => write!(f, "No message is waiting for a reply"),
        }
    }
}

impl Error for TurnError {}

/// Request the caller must hand to the gateway after a successful
/// [`Conversation::begin_turn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub session_id: String,
    pub message: String,
}

/// Turn-handling flow over a [`Session`].
///
/// Keeps user and assistant turns strictly alternating: a new user turn is
/// refused until the previous one has been answered.
#[derive(Debug, Clone)]
pub struct Conversation {
    session: Session,
    awaiting_reply: bool,
}

impl Conversation {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            awaiting_reply: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn begin_turn(&mut self, text: impl Into<String>) -> Result<PendingTurn, TurnError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }
        if self.awaiting_reply {
            return Err(TurnError::ReplyPending);
        }

        self.session.push_turn(Turn::user(text.clone()));
        self.awaiting_reply = true;
        Ok(PendingTurn {
            session_id: self.session.id().to_string(),
            message: text,
        })
    }

    pub fn finish_turn(&mut self, result: GatewayResult) -> Result<(), TurnError> {
        if !self.awaiting_reply {
            return Err(TurnError::NoPendingTurn);
        }
        self.session.push_turn(Turn::assistant(result));
        self.awaiting_reply = false;
        Ok(())
    }
}
