//! Wire protocol for Chessify.
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`Role`], [`Side`],
//!   [`MoveRequest`]): what travels over a connection.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (bytes) → Protocol (messages) → Session (coordinator)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, MoveRequest, Role, ServerMessage, Side};
