//! xo_lobby - chat-scoped tic-tac-toe sessions
//!
//! A chat bot posts an invitation, a second participant joins, and the two
//! alternate moves until a win, a draw or a surrender. This crate owns that
//! session state; rendering and chat transport belong to the caller.
//!
//! # Architecture
//!
//! - **Session**: the invitation and game table behind [`SessionManager`]
//! - **Request**: plain-data [`Request`]/[`Response`] and [`dispatch`]
//! - **Server**: an axum [`router`] exposing `dispatch` over JSON
//! - **Rules**: board and win evaluation, re-exported from `xo_rules`
//!
//! # Example
//!
//! ```
//! use xo_lobby::{ChatScope, GameStatus, ParticipantId, SequentialGameIds, SessionManager};
//!
//! let manager = SessionManager::with_ids(SequentialGameIds::new());
//! let chat = ChatScope::new(1);
//! let (host, joiner) = (ParticipantId::new(10), ParticipantId::new(20));
//!
//! let id = manager.create_invitation(chat, host)?;
//! manager.join_game(chat, &id, joiner)?;
//! let game = manager.apply_move(chat, &id, host, 4)?;
//! assert_eq!(*game.status(), GameStatus::InProgress);
//! # Ok::<(), xo_lobby::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod request;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, HOST_VAR, PORT_VAR, ServerConfig, SweepConfig};

// Crate-level exports - Request layer
pub use request::{Request, Response, dispatch};

// Crate-level exports - HTTP
pub use server::{ApiError, router, spawn_sweeper};

// Crate-level exports - Session management
pub use session::{
    ChatScope, DEFAULT_GAME_ID_LENGTH, ExclusivityScope, GAME_ID_ALPHABET, Game, GameId,
    GameIdGenerator, GameStatus, Invitation, MAX_GAME_ID_LENGTH, MAX_ID_ATTEMPTS, ParticipantId,
    Players, RandomGameIds, SequentialGameIds, SessionError, SessionManager, SessionStats,
    SweptEntry,
};

// Crate-level exports - Rules
pub use xo_rules::{Board, Mark, Position, Square, Verdict};
