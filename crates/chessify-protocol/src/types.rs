//! Message types exchanged between the server and its clients.
//!
//! Every frame is a JSON object tagged by `"type"`:
//!
//! ```text
//! server → client   {"type":"role","role":"white"}
//! server → client   {"type":"state","fen":"rnbqkbnr/..."}
//! server → client   {"type":"move_rejected","reason":"not your turn"}
//! client → server   {"type":"move","from":"e2","to":"e4"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Side / Role
// ---------------------------------------------------------------------------

/// One of the two controlling sides of the game.
///
/// Seats are scanned in [`Side::ALL`] order when a connection arrives, so
/// the first player is always `White`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Both sides, in seat-assignment order.
    pub const ALL: [Side; 2] = [Side::White, Side::Black];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// The role assigned to a connection for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Controls the white pieces.
    White,
    /// Controls the black pieces.
    Black,
    /// Watches the game; receives every state update, cannot move.
    Spectator,
}

impl Role {
    /// The player role for a seat.
    pub fn seated(side: Side) -> Self {
        match side {
            Side::White => Self::White,
            Side::Black => Self::Black,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
            Self::Spectator => write!(f, "spectator"),
        }
    }
}

// ---------------------------------------------------------------------------
// MoveRequest
// ---------------------------------------------------------------------------

/// A move as submitted by a client: source square, target square, and the
/// piece letter to promote to when a pawn reaches the last rank.
///
/// No validation happens here; squares are free-form strings until the
/// rules engine parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

impl MoveRequest {
    /// Convenience constructor for a non-promoting move.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    /// Sets the promotion piece letter (`q`, `r`, `b`, `n`).
    pub fn promoting(mut self, piece: impl Into<String>) -> Self {
        self.promotion = Some(piece.into());
        self
    }
}

/// Formats the move in long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = &self.promotion {
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request to play a move in the shared game.
    Move(MoveRequest),
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent privately, once, right after connecting.
    Role { role: Role },

    /// The canonical position. Sent privately on connect and to every
    /// connection after each accepted move.
    State { fen: String },

    /// Sent only to the connection whose move was refused.
    MoveRejected { reason: String },
}

// =========================================================================
// Tests
// =========================================================================
