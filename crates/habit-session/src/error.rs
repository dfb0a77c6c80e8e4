//! # Session Error Types
//!
//! Construction-time failures. Operations on a running session never fail;
//! they are either applied or rejected, see [`Rejection`].

use thiserror::Error;

/// Errors raised while building a simulator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The reply table has no entries
    #[error("Scripted reply table must not be empty")]
    EmptyReplyScript,

    /// A reply table entry is blank
    #[error("Scripted reply #{index} is blank")]
    BlankReply { index: usize },

    /// A suggestion label is blank
    #[error("Suggestion #{index} is blank")]
    BlankSuggestion { index: usize },
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Why a session operation was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Text was empty after trimming
    InvalidInput,
    /// A scripted reply is still outstanding
    ReplyPending,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::InvalidInput => write!(f, "empty message"),
            Rejection::ReplyPending => write!(f, "reply pending"),
        }
    }
}
