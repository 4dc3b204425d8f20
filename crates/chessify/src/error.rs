//! Unified error type for the Chessify server.

use chessify_protocol::ProtocolError;
use chessify_session::SessionError;
use chessify_transport::TransportError;

/// Top-level error wrapping every crate-specific error.
///
/// `#[from]` on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum ChessifyError {
    /// Binding, accepting, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session actor is gone.
    #[error(transparent)]
    Session(#[from] SessionError),
}
