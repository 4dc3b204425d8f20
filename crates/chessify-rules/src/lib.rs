//! Game rules for Chessify.
//!
//! The session coordinator never decides whether a move is legal. It asks
//! a [`RulesEngine`], which owns the position type and knows how to
//! advance it and print it.
//!
//! # Key types
//!
//! - [`RulesEngine`]: the capability the coordinator consumes
//! - [`RulesError`]: why an engine refused a move
//! - [`StandardChess`]: standard chess backed by `shakmaty`, FEN output

mod chess;
mod engine;
mod error;

pub use chess::StandardChess;
pub use engine::RulesEngine;
pub use error::RulesError;
