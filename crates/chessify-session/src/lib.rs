//! The shared game session for Chessify.
//!
//! One game, many connections. The first two connections take the white
//! and black seats, everyone else watches. Moves are checked for turn
//! authority here and for legality by the [`RulesEngine`]; accepted moves
//! are broadcast, rejections go back to the sender only.
//!
//! # Key types
//!
//! - [`Coordinator`]: the synchronous session state machine
//! - [`Seats`]: which connection holds which side
//! - [`SessionHandle`]: send events to the session actor task
//! - [`MoveError`]: why a move was refused
//!
//! [`RulesEngine`]: chessify_rules::RulesEngine

mod actor;
mod coordinator;
mod error;
mod seats;

pub use actor::{PeerSender, SessionHandle, SessionInfo, spawn_session};
pub use coordinator::{Coordinator, Outbound, Recipient};
pub use error::{MoveError, SessionError};
pub use seats::Seats;
