//! Error types for the rules layer.

/// Why a rules engine refused to advance a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The move is malformed or breaks the rules of the game.
    #[error("illegal move: {0}")]
    Illegal(String),

    /// The engine failed internally while evaluating the move.
    #[error("engine fault: {0}")]
    Fault(String),
}
