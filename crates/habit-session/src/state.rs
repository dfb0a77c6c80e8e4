//! # Session State
//!
//! The aggregate owned by one goal-setting session and its state transitions.
//! Every method here is synchronous; scheduling the deferred reply is the
//! simulator's job.

use tracing::debug;

use crate::error::Rejection;
use crate::types::{Message, MessageId, Sender, SessionSnapshot, Stage};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI habit coach. What new habit would you like to build? You can type your own goal or select from the suggestions below.";
pub const EXAMPLE_USER_MESSAGE: &str = "I want to exercise more consistently.";

/// Transcript, pending-reply flag and stage of one session
#[derive(Debug, Clone)]
pub struct SessionState {
    transcript: Vec<Message>,
    awaiting_reply: bool,
    stage: Stage,
    next_id: u64,
}

impl SessionState {
    /// Empty session on the first stage
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            awaiting_reply: false,
            stage: Stage::FIRST,
            next_id: 1,
        }
    }

    /// Session opened with the welcome message and one example exchange
    pub fn seeded() -> Self {
        let mut state = Self::new();
        state.push(Sender::Assistant, WELCOME_MESSAGE.to_string(), "2:30 PM".to_string());
        state.push(Sender::User, EXAMPLE_USER_MESSAGE.to_string(), "2:31 PM".to_string());
        state
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            transcript: self.transcript.clone(),
            awaiting_reply: self.awaiting_reply,
            stage: self.stage,
        }
    }

    /// Append a user message and mark a reply as pending.
    ///
    /// `text` is trimmed first. Blank text, or a reply already outstanding,
    /// leaves the state untouched.
    pub fn submit_user_message(
        &mut self,
        text: &str,
        timestamp: String,
    ) -> Result<MessageId, Rejection> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Rejection::InvalidInput);
        }
        if self.awaiting_reply {
            return Err(Rejection::ReplyPending);
        }

        let id = self.push(Sender::User, text.to_string(), timestamp);
        self.awaiting_reply = true;
        Ok(id)
    }

    /// Append the assistant's reply, clear the pending flag and advance the
    /// stage by one unless it is already the last.
    pub fn complete_reply(&mut self, text: String, timestamp: String) -> MessageId {
        let id = self.push(Sender::Assistant, text, timestamp);
        self.awaiting_reply = false;
        if let Some(next) = self.stage.next() {
            debug!(from = %self.stage, to = %next, "Stage advanced");
            self.stage = next;
        }
        id
    }

    /// Abandon an outstanding reply without appending anything
    pub fn cancel_reply(&mut self) {
        self.awaiting_reply = false;
    }

    /// Set the stage directly, clamping `n` into `1..=4`
    pub fn jump_to_stage(&mut self, n: i64) {
        let stage = Stage::clamped(n);
        if stage.number() as i64 != n {
            debug!(requested = n, clamped = stage.number(), "Stage out of range, clamped");
        }
        self.stage = stage;
    }

    fn push(&mut self, sender: Sender, text: String, timestamp: String) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.transcript.push(Message::new(id, sender, text, timestamp));
        id
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::seeded()
    }
}
