//! The `RulesEngine` trait: the seam between the coordinator and game rules.

use chessify_protocol::{MoveRequest, Side};

use crate::RulesError;

/// A two-sided, turn-based game the session coordinator can host.
///
/// Implementors are usually zero-sized marker types; all state lives in
/// [`Position`](Self::Position), which the coordinator stores and hands
/// back but never inspects.
///
/// # Contract
///
/// - `apply` takes the position by reference and returns a new one. A
///   rejected move leaves the caller's position untouched.
/// - `serialize` is deterministic: equal positions print identically.
pub trait RulesEngine: Send + Sync + 'static {
    /// The full game state.
    type Position: Send + Clone + 'static;

    /// The start-of-game position. Called each time a session is created.
    fn initial_position() -> Self::Position;

    /// Which side is to move.
    fn active_side(position: &Self::Position) -> Side;

    /// Plays `request` on `position`.
    ///
    /// # Errors
    /// - [`RulesError::Illegal`] if the request does not parse or is not a
    ///   legal move in this position.
    /// - [`RulesError::Fault`] if the engine cannot evaluate the request.
    fn apply(
        position: &Self::Position,
        request: &MoveRequest,
    ) -> Result<Self::Position, RulesError>;

    /// The canonical text form broadcast to clients.
    fn serialize(position: &Self::Position) -> String;
}
