//! Per-connection handler.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]:
//!   1. Register with the session → role and position are queued
//!   2. Spawn a writer that drains the outbound channel onto the socket
//!   3. Loop: receive frames → decode → forward moves to the session

use std::sync::Arc;

use chessify_protocol::{ClientMessage, Codec, JsonCodec, ServerMessage};
use chessify_session::SessionHandle;
use chessify_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ChessifyError;
use crate::server::ServerState;

/// Drop guard that deregisters the connection when the handler exits,
/// including on early return or panic.
///
/// `Drop` is synchronous, so the disconnect is sent from a spawned task.
struct SessionGuard {
    conn_id: ConnectionId,
    session: SessionHandle,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let session = self.session.clone();
        tokio::spawn(async move {
            let _ = session.disconnect(conn_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ChessifyError> {
    let conn_id = conn.id();
    let conn = Arc::new(conn);
    tracing::debug!(%conn_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    let role = state.session.connect(conn_id, tx).await?;
    let _guard = SessionGuard {
        conn_id,
        session: state.session.clone(),
    };
    tracing::info!(%conn_id, %role, "client connected");

    spawn_writer(Arc::clone(&conn), state.codec, rx);

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                if let Err(e) = conn.close().await {
                    tracing::debug!(%conn_id, error = %e, "close after recv error failed");
                }
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "ignoring undecodable frame");
                continue;
            }
        };

        match msg {
            ClientMessage::Move(request) => {
                state.session.submit_move(conn_id, request).await?;
            }
        }
    }

    // The writer ends once the session drops our sender on disconnect.
    Ok(())
}

/// Spawns the task that encodes outbound messages and writes them to the
/// socket, in the order the session dispatched them.
fn spawn_writer(
    conn: Arc<WebSocketConnection>,
    codec: JsonCodec,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
) {
    tokio::spawn(async move {
        let conn_id = conn.id();
        while let Some(msg) = rx.recv().await {
            let bytes = match codec.encode(&msg) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(%conn_id, error = %e, "failed to encode message");
                    continue;
                }
            };
            if let Err(e) = conn.send(&bytes).await {
                tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
                break;
            }
        }
    });
}
