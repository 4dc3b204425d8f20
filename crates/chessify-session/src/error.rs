//! Error types for the session layer.

use chessify_rules::RulesError;

/// Why a move request was refused.
///
/// Every variant is recovered locally: the requester gets a private
/// rejection carrying [`reason`](Self::reason) and the session is left
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// No game is in progress.
    #[error("no active session")]
    NoActiveSession,

    /// The requester does not hold the seat of the side to move.
    #[error("not your turn")]
    NotYourTurn,

    /// The rules engine refused the move.
    #[error("illegal action: {0}")]
    Illegal(String),

    /// The rules engine failed or panicked while evaluating the move.
    #[error("processing error: {0}")]
    Fault(String),
}

impl MoveError {
    /// The reason string sent to the client.
    ///
    /// Moves without a game are reported exactly like illegal ones.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoActiveSession | Self::Illegal(_) => "illegal action",
            Self::NotYourTurn => "not your turn",
            Self::Fault(_) => "processing error",
        }
    }
}

impl From<RulesError> for MoveError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::Illegal(detail) => Self::Illegal(detail),
            RulesError::Fault(detail) => Self::Fault(detail),
        }
    }
}

/// Errors from talking to the session actor.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The actor task has stopped; its command channel is closed.
    #[error("session is unavailable")]
    Unavailable,
}
