//! # Chessify
//!
//! A server for one shared game of chess played over WebSocket.
//!
//! The first two clients to connect take the white and black seats; every
//! later client watches. Moves are validated by a [`RulesEngine`] and each
//! accepted move is broadcast to everyone as a FEN string. When both
//! players leave, the game is thrown away and the next client starts a
//! fresh one.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chessify::prelude::*;
//!
//! # async fn run() -> Result<(), ChessifyError> {
//! let server = ChessifyServerBuilder::new()
//!     .bind("0.0.0.0:3000")
//!     .build::<StandardChess>()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ChessifyError;
pub use server::{ChessifyServer, ChessifyServerBuilder, DEFAULT_COMMAND_CAPACITY};

pub use chessify_protocol::{ClientMessage, MoveRequest, Role, ServerMessage, Side};
pub use chessify_rules::{RulesEngine, RulesError, StandardChess};

/// Everything needed to run a server or write a client test.
pub mod prelude {
    pub use crate::{ChessifyError, ChessifyServer, ChessifyServerBuilder};
    pub use chessify_protocol::{
        ClientMessage, Codec, JsonCodec, MoveRequest, ProtocolError, Role, ServerMessage, Side,
    };
    pub use chessify_rules::{RulesEngine, RulesError, StandardChess};
    pub use chessify_session::{SessionError, SessionHandle, SessionInfo};
    pub use chessify_transport::{ConnectionId, TransportError};
}
