//! Chat-scoped game sessions.
//!
//! A game starts life as an [`Invitation`] posted by its host, becomes a
//! [`Game`] when a second participant joins, and is removed from the table
//! as soon as it is won, drawn or surrendered.

mod error;
mod ids;
mod manager;
mod table;
mod types;

pub use error::SessionError;
pub use ids::{
    DEFAULT_GAME_ID_LENGTH, GAME_ID_ALPHABET, GameIdGenerator, MAX_GAME_ID_LENGTH, RandomGameIds,
    SequentialGameIds,
};
pub use manager::SessionManager;
pub use table::{ExclusivityScope, MAX_ID_ATTEMPTS, SessionStats, SweptEntry};
pub use types::{ChatScope, Game, GameId, GameStatus, Invitation, ParticipantId, Players};
