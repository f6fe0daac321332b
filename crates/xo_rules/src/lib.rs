//! Pure tic-tac-toe rules.
//!
//! Board, marks, positions and the canonical win/draw evaluation.
//! Nothing in this crate knows about chats, participants or sessions.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod position;
pub mod rules;
mod types;

pub use position::Position;
pub use rules::{Verdict, evaluate};
pub use types::{Board, Mark, PlaceError, Square};
