//! The session coordinator: seat assignment, turn authority, and the
//! create/reset lifecycle of the one shared game.
//!
//! `Coordinator` does no I/O. Each operation returns the messages to
//! deliver as `(Recipient, ServerMessage)` pairs and the actor in
//! `actor.rs` routes them.
//!
//! ```text
//!            connect (first after reset)
//!   Absent ─────────────────────────────→ Active { position, seats }
//!     ↑                                      │
//!     └──── disconnect leaves both seats ────┘
//!                  vacant (silent)
//! ```

use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

use chessify_protocol::{MoveRequest, Role, ServerMessage, Side};
use chessify_rules::RulesEngine;
use chessify_transport::ConnectionId;

use crate::{MoveError, Seats};

/// Who a server message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection registered when the message is dispatched.
    All,
    /// One connection only.
    Connection(ConnectionId),
}

/// A message and its addressee.
pub type Outbound = (Recipient, ServerMessage);

/// The game in progress.
struct SessionRecord<P> {
    position: P,
    seats: Seats,
}

enum SessionSlot<P> {
    Absent,
    Active(SessionRecord<P>),
}

impl<P> SessionSlot<P> {
    fn get_or_try_insert_with<E>(
        &mut self,
        create: impl FnOnce() -> Result<SessionRecord<P>, E>,
    ) -> Result<&mut SessionRecord<P>, E> {
        if let Self::Absent = self {
            *self = Self::Active(create()?);
        }
        match self {
            Self::Active(record) => Ok(record),
            Self::Absent => unreachable!("session was just created"),
        }
    }
}

/// Owns the single shared session for rules engine `R`.
pub struct Coordinator<R: RulesEngine> {
    slot: SessionSlot<R::Position>,
    _rules: PhantomData<R>,
}

impl<R: RulesEngine> Coordinator<R> {
    /// A coordinator with no game in progress. The first
    /// [`connect`](Self::connect) creates one.
    pub fn new() -> Self {
        Self {
            slot: SessionSlot::Absent,
            _rules: PhantomData,
        }
    }

    /// Registers a new connection.
    ///
    /// Creates the session if there is none, seats the connection in the
    /// first vacant seat (or makes it a spectator), and answers privately
    /// with its role followed by the current position.
    ///
    /// If the engine fails to produce a starting position, no session is
    /// created and the connection is told it is a spectator. If it fails
    /// to print the position, the state message is left out.
    pub fn connect(&mut self, conn: ConnectionId) -> (Role, Vec<Outbound>) {
        let to = Recipient::Connection(conn);

        let created = self.slot.get_or_try_insert_with(|| {
            let position = guarded(R::initial_position)?;
            tracing::info!("new game created");
            Ok::<_, MoveError>(SessionRecord {
                position,
                seats: Seats::new(),
            })
        });
        let record = match created {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(%conn, error = %err, "could not create game");
                let role = Role::Spectator;
                return (role, vec![(to, ServerMessage::Role { role })]);
            }
        };

        let role = record.seats.claim(conn);
        tracing::info!(%conn, %role, "role assigned");

        let mut out = vec![(to, ServerMessage::Role { role })];
        match guarded(|| R::serialize(&record.position)) {
            Ok(fen) => out.push((to, ServerMessage::State { fen })),
            Err(err) => tracing::warn!(%conn, error = %err, "could not serialize position"),
        }
        (role, out)
    }

    /// Forgets a connection.
    ///
    /// Frees its seat if it held one. Once both seats are vacant the game
    /// is dropped without notifying anyone; the next connection starts a
    /// fresh one. Returns the side that was freed.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Option<Side> {
        let SessionSlot::Active(record) = &mut self.slot else {
            return None;
        };

        let vacated = record.seats.release(conn);
        if let Some(side) = vacated {
            tracing::info!(%conn, %side, "seat vacated");
        }

        if record.seats.is_vacant() {
            self.slot = SessionSlot::Absent;
            tracing::info!("game reset: both players disconnected");
        }
        vacated
    }

    /// Handles a move request and returns what to deliver: the new state
    /// to everyone on success, a rejection to `conn` alone otherwise.
    pub fn submit_move(
        &mut self,
        conn: ConnectionId,
        request: &MoveRequest,
    ) -> Vec<Outbound> {
        match self.play(conn, request) {
            Ok(fen) => {
                tracing::info!(%conn, %request, "move made");
                vec![(Recipient::All, ServerMessage::State { fen })]
            }
            Err(err) => {
                match &err {
                    MoveError::Fault(_) => {
                        tracing::warn!(%conn, %request, error = %err, "move failed")
                    }
                    _ => tracing::debug!(%conn, %request, error = %err, "move rejected"),
                }
                vec![(
                    Recipient::Connection(conn),
                    ServerMessage::MoveRejected {
                        reason: err.reason().to_string(),
                    },
                )]
            }
        }
    }

    /// Plays `request` for `conn` and returns the new canonical position.
    ///
    /// Turn authority is checked before the rules engine sees the move.
    /// On any error the position is unchanged.
    ///
    /// # Errors
    /// See [`MoveError`].
    pub fn play(
        &mut self,
        conn: ConnectionId,
        request: &MoveRequest,
    ) -> Result<String, MoveError> {
        let SessionSlot::Active(record) = &mut self.slot else {
            return Err(MoveError::NoActiveSession);
        };

        let position = &record.position;
        let to_move = guarded(|| R::active_side(position))?;
        if record.seats.holder(to_move) != Some(conn) {
            return Err(MoveError::NotYourTurn);
        }

        let next = guarded(|| R::apply(position, request))??;
        let fen = guarded(|| R::serialize(&next))?;
        record.position = next;
        Ok(fen)
    }

    /// `true` while a game exists.
    pub fn is_active(&self) -> bool {
        matches!(self.slot, SessionSlot::Active(_))
    }

    /// Current seat holders. All vacant when no game exists.
    pub fn seats(&self) -> Seats {
        match &self.slot {
            SessionSlot::Active(record) => record.seats,
            SessionSlot::Absent => Seats::new(),
        }
    }

    /// The canonical position, recomputed from the rules engine. `None`
    /// without a game, or if the engine fails to print it.
    pub fn position_text(&self) -> Option<String> {
        let SessionSlot::Active(record) = &self.slot else {
            return None;
        };
        guarded(|| R::serialize(&record.position))
            .inspect_err(|err| tracing::warn!(error = %err, "could not serialize position"))
            .ok()
    }
}

impl<R: RulesEngine> Default for Coordinator<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a rules engine call, turning a panic into [`MoveError::Fault`].
/// Every engine call the coordinator makes goes through here.
fn guarded<T>(call: impl FnOnce() -> T) -> Result<T, MoveError> {
    panic::catch_unwind(AssertUnwindSafe(call)).map_err(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "rules engine panicked".to_string());
        MoveError::Fault(detail)
    })
}
