//! `ChessifyServer` builder and accept loop.
//!
//! Ties the layers together: WebSocket transport → JSON codec → session
//! actor.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chessify_protocol::JsonCodec;
use chessify_rules::RulesEngine;
use chessify_session::{SessionHandle, spawn_session};
use chessify_transport::{DEFAULT_HANDSHAKE_TIMEOUT, Incoming, Transport, WebSocketTransport};

use crate::ChessifyError;
use crate::handler::handle_connection;

/// Default bound of the session actor's command queue.
pub const DEFAULT_COMMAND_CAPACITY: usize = 256;

/// Shared state handed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) session: SessionHandle,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Chessify server.
///
/// # Example
///
/// ```rust,ignore
/// let server = ChessifyServerBuilder::new()
///     .bind("127.0.0.1:0")
///     .command_capacity(64)
///     .build::<StandardChess>()
///     .await?;
/// println!("listening on {}", server.local_addr()?);
/// ```
pub struct ChessifyServerBuilder {
    bind_addr: String,
    command_capacity: usize,
    handshake_timeout: Duration,
}

impl ChessifyServerBuilder {
    /// Creates a builder with default settings (`0.0.0.0:3000`).
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to listen on.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets how many session commands may queue before handlers wait.
    /// Clamped to at least 1.
    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    /// Sets how long a new client may take to finish the WebSocket upgrade
    /// before it is dropped.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and starts the session actor for rules `R`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`ChessifyError::Transport`] if the address cannot be bound.
    pub async fn build<R: RulesEngine>(self) -> Result<ChessifyServer<R>, ChessifyError> {
        let transport = WebSocketTransport::bind(&self.bind_addr)
            .await?
            .with_handshake_timeout(self.handshake_timeout);
        let session = spawn_session::<R>(self.command_capacity);

        let state = Arc::new(ServerState {
            session,
            codec: JsonCodec,
        });

        Ok(ChessifyServer {
            transport,
            state,
            _rules: PhantomData,
        })
    }
}

impl Default for ChessifyServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Chessify server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ChessifyServer<R: RulesEngine> {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
    _rules: PhantomData<R>,
}

impl<R: RulesEngine> ChessifyServer<R> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle to the session actor.
    pub fn session(&self) -> SessionHandle {
        self.state.session.clone()
    }

    /// Runs the accept loop, spawning a task per client that performs the
    /// WebSocket upgrade and then runs the connection handler.
    ///
    /// Runs until the process is terminated. Failed accepts are logged and
    /// the loop keeps going.
    pub async fn run(mut self) -> Result<(), ChessifyError> {
        tracing::info!("chessify server running");

        loop {
            match self.transport.accept().await {
                Ok(incoming) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let peer = incoming.peer_addr();
                        let conn = match incoming.upgrade().await {
                            Ok(conn) => conn,
                            Err(e) => {
                                tracing::debug!(%peer, error = %e, "upgrade failed");
                                return;
                            }
                        };
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
