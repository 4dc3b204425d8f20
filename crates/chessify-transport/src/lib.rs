//! Connection layer for Chessify.
//!
//! The session coordinator only ever sees a [`ConnectionId`]; everything
//! that touches sockets lives behind the [`Transport`] and [`Connection`]
//! traits defined here.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{
    DEFAULT_HANDSHAKE_TIMEOUT, WebSocketConnection, WebSocketIncoming, WebSocketTransport,
};

use std::fmt;

/// Opaque identifier for one accepted connection.
///
/// Unique for the lifetime of the process; a client that reconnects gets
/// a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw id. The WebSocket transport allocates these from a
    /// process-wide counter; tests build them by hand.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A listener handing out clients one at a time.
///
/// `accept` only waits for the socket. The protocol handshake runs later
/// through [`Incoming::upgrade`], so a client that stalls mid-handshake
/// holds up its own task and not the accept loop.
pub trait Transport: Send + Sync + 'static {
    /// What [`accept`](Self::accept) yields.
    type Incoming: Incoming;
    /// Error raised when no client could be accepted.
    type Error: std::error::Error + Send + Sync;

    /// Resolves with the next client socket.
    async fn accept(&mut self) -> Result<Self::Incoming, Self::Error>;
}

/// An accepted socket whose handshake has not run yet.
pub trait Incoming: Send + 'static {
    /// The connection produced by a successful handshake.
    type Connection: Connection;
    /// Error raised when the handshake fails or times out.
    type Error: std::error::Error + Send + Sync;

    /// Completes the handshake.
    async fn upgrade(self) -> Result<Self::Connection, Self::Error>;
}

/// One client's framed, bidirectional channel.
///
/// `send` and `recv` take `&self` and may run concurrently: a handler
/// parks in `recv` while another task pushes session updates through
/// `send`.
pub trait Connection: Send + Sync + 'static {
    /// Error raised by any I/O on the connection.
    type Error: std::error::Error + Send + Sync;

    /// Writes one frame.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads the next data frame, or `Ok(None)` once the peer has closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Starts the closing handshake.
    async fn close(&self) -> Result<(), Self::Error>;

    /// This connection's process-unique id.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_orders_by_accept_sequence() {
        let mut ids = vec![
            ConnectionId::new(3),
            ConnectionId::new(1),
            ConnectionId::new(2),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                ConnectionId::new(1),
                ConnectionId::new(2),
                ConnectionId::new(3)
            ]
        );
    }
}
