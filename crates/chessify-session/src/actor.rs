//! Session actor: a single Tokio task that owns the [`Coordinator`] and
//! every connection's outbound channel.
//!
//! Connection handlers never touch the session directly. They send
//! commands through a [`SessionHandle`]; the actor takes them off one
//! channel and runs each to completion before the next, so connect,
//! disconnect and move events never interleave.

use std::collections::BTreeMap;

use chessify_protocol::{MoveRequest, Role, ServerMessage, Side};
use chessify_rules::RulesEngine;
use chessify_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{Coordinator, Outbound, Recipient, SessionError};

/// Channel sender for delivering server messages to one connection.
pub type PeerSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to the session actor through its channel.
enum SessionCommand {
    Connect {
        conn: ConnectionId,
        sender: PeerSender,
        reply: oneshot::Sender<Role>,
    },
    Disconnect {
        conn: ConnectionId,
    },
    Move {
        conn: ConnectionId,
        request: MoveRequest,
    },
    Info {
        reply: oneshot::Sender<SessionInfo>,
    },
    Shutdown,
}

/// A snapshot of the session for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Whether a game currently exists.
    pub active: bool,
    /// Holder of the white seat.
    pub white: Option<ConnectionId>,
    /// Holder of the black seat.
    pub black: Option<ConnectionId>,
    /// Connections currently registered, players and spectators.
    pub connections: usize,
    /// Canonical position, if a game exists.
    pub position: Option<String>,
}

/// Handle to the running session actor. Cheap to clone.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    async fn send(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| SessionError::Unavailable)
    }

    /// Registers a connection and returns the role it was given.
    ///
    /// The role and the current position are also pushed to `sender`.
    pub async fn connect(
        &self,
        conn: ConnectionId,
        sender: PeerSender,
    ) -> Result<Role, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Connect {
            conn,
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| SessionError::Unavailable)
    }

    /// Deregisters a connection (fire-and-forget).
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), SessionError> {
        self.send(SessionCommand::Disconnect { conn }).await
    }

    /// Submits a move on behalf of a connection (fire-and-forget). The
    /// outcome arrives on the connection's outbound channel.
    pub async fn submit_move(
        &self,
        conn: ConnectionId,
        request: MoveRequest,
    ) -> Result<(), SessionError> {
        self.send(SessionCommand::Move { conn, request }).await
    }

    /// Requests a snapshot of the session.
    pub async fn info(&self) -> Result<SessionInfo, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SessionCommand::Info { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| SessionError::Unavailable)
    }

    /// Tells the actor to stop. Later calls on any handle fail with
    /// [`SessionError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown).await
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct SessionActor<R: RulesEngine> {
    coordinator: Coordinator<R>,
    peers: BTreeMap<ConnectionId, PeerSender>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<R: RulesEngine> SessionActor<R> {
    async fn run(mut self) {
        tracing::info!("session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Connect {
                    conn,
                    sender,
                    reply,
                } => {
                    self.peers.insert(conn, sender);
                    let (role, out) = self.coordinator.connect(conn);
                    self.dispatch(out);
                    let _ = reply.send(role);
                }
                SessionCommand::Disconnect { conn } => {
                    self.peers.remove(&conn);
                    self.coordinator.disconnect(conn);
                    tracing::info!(
                        %conn,
                        connections = self.peers.len(),
                        seated = self.coordinator.seats().occupied(),
                        "connection removed"
                    );
                }
                SessionCommand::Move { conn, request } => {
                    let out = self.coordinator.submit_move(conn, &request);
                    self.dispatch(out);
                }
                SessionCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                SessionCommand::Shutdown => {
                    tracing::info!("session shutting down");
                    break;
                }
            }
        }

        tracing::info!("session actor stopped");
    }

    /// Delivers outbound messages. `All` means the peers registered right
    /// now, in connection order.
    fn dispatch(&self, msgs: Vec<Outbound>) {
        for (recipient, msg) in msgs {
            match recipient {
                Recipient::All => {
                    for conn in self.peers.keys() {
                        self.send_to(*conn, msg.clone());
                    }
                }
                Recipient::Connection(conn) => self.send_to(conn, msg),
            }
        }
    }

    /// Sends to one peer. Silently drops if its receiver is gone.
    fn send_to(&self, conn: ConnectionId, msg: ServerMessage) {
        if let Some(sender) = self.peers.get(&conn) {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> SessionInfo {
        let seats = self.coordinator.seats();
        SessionInfo {
            active: self.coordinator.is_active(),
            white: seats.holder(Side::White),
            black: seats.holder(Side::Black),
            connections: self.peers.len(),
            position: self.coordinator.position_text(),
        }
    }
}

/// Spawns the session actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub fn spawn_session<R: RulesEngine>(channel_size: usize) -> SessionHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = SessionActor::<R> {
        coordinator: Coordinator::new(),
        peers: BTreeMap::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    SessionHandle { sender: tx }
}
