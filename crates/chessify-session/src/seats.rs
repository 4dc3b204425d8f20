//! Seat bookkeeping: which connection controls which side.

use chessify_protocol::{Role, Side};
use chessify_transport::ConnectionId;

/// The two controller seats of a game.
///
/// Both seats are always present, vacant or held. A connection holds at
/// most one seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seats {
    white: Option<ConnectionId>,
    black: Option<ConnectionId>,
}

impl Seats {
    /// Both seats vacant.
    pub fn new() -> Self {
        Self::default()
    }

    /// The connection holding `side`, if any.
    pub fn holder(&self, side: Side) -> Option<ConnectionId> {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<ConnectionId> {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    /// The side `conn` controls, if it holds a seat.
    pub fn side_of(&self, conn: ConnectionId) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.holder(*side) == Some(conn))
    }

    /// Seats `conn` in the first vacant seat, scanning white then black.
    ///
    /// Returns the role it ends up with: a player role, or
    /// [`Role::Spectator`] when both seats are taken. A connection that
    /// already holds a seat keeps it.
    pub fn claim(&mut self, conn: ConnectionId) -> Role {
        if let Some(side) = self.side_of(conn) {
            return Role::seated(side);
        }
        for side in Side::ALL {
            let slot = self.slot_mut(side);
            if slot.is_none() {
                *slot = Some(conn);
                return Role::seated(side);
            }
        }
        Role::Spectator
    }

    /// Vacates the seat held by `conn`. Returns the side freed, or `None`
    /// if `conn` was not seated.
    pub fn release(&mut self, conn: ConnectionId) -> Option<Side> {
        let side = self.side_of(conn)?;
        *self.slot_mut(side) = None;
        Some(side)
    }

    /// `true` when neither seat is held.
    pub fn is_vacant(&self) -> bool {
        self.white.is_none() && self.black.is_none()
    }

    /// Number of held seats (0–2).
    pub fn occupied(&self) -> usize {
        Side::ALL
            .into_iter()
            .filter(|side| self.holder(*side).is_some())
            .count()
    }
}
