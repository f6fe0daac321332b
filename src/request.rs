//! Plain-data requests and responses.
//!
//! A presentation layer (chat bot, HTTP handler, test harness) decodes a
//! participant's action into a [`Request`], hands it to [`dispatch`] and
//! renders whatever comes back.

use crate::session::{ChatScope, Game, GameId, ParticipantId, SessionError, SessionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A participant action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Post a new invitation.
    StartGame {
        /// Chat to post in.
        chat: ChatScope,
        /// Participant hosting the game.
        host: ParticipantId,
    },
    /// Accept an invitation.
    JoinGame {
        /// Chat the invitation lives in.
        chat: ChatScope,
        /// Invitation to accept.
        game_id: GameId,
        /// Participant taking the O seat.
        joiner: ParticipantId,
    },
    /// Withdraw an invitation.
    CancelGame {
        /// Chat the invitation lives in.
        chat: ChatScope,
        /// Invitation to withdraw.
        game_id: GameId,
        /// Must be the host.
        requester: ParticipantId,
    },
    /// Place a mark.
    MakeMove {
        /// Chat the game lives in.
        chat: ChatScope,
        /// Game to move in.
        game_id: GameId,
        /// Participant moving.
        requester: ParticipantId,
        /// Cell index, 0-8 row-major.
        cell: i64,
    },
    /// Concede.
    Surrender {
        /// Chat the game lives in.
        chat: ChatScope,
        /// Game to concede.
        game_id: GameId,
        /// Participant giving up.
        requester: ParticipantId,
    },
}

/// Outcome of an accepted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Invitation posted.
    Invited {
        /// Id to join with.
        game_id: GameId,
    },
    /// Invitation withdrawn.
    Cancelled {
        /// Withdrawn id.
        game_id: GameId,
    },
    /// Snapshot after a join or move.
    Game(Game),
    /// Game conceded.
    Surrendered {
        /// Conceded game.
        game_id: GameId,
        /// Remaining participant.
        winner: ParticipantId,
    },
}

/// Routes `request` to the matching [`SessionManager`] operation.
#[instrument(skip(manager))]
pub fn dispatch(manager: &SessionManager, request: Request) -> Result<Response, SessionError> {
    let response = match request {
        Request::StartGame { chat, host } => {
            let game_id = manager.create_invitation(chat, host)?;
            Response::Invited { game_id }
        }
        Request::JoinGame {
            chat,
            game_id,
            joiner,
        } => Response::Game(manager.join_game(chat, &game_id, joiner)?),
        Request::CancelGame {
            chat,
            game_id,
            requester,
        } => {
            manager.cancel_invitation(chat, &game_id, requester)?;
            Response::Cancelled { game_id }
        }
        Request::MakeMove {
            chat,
            game_id,
            requester,
            cell,
        } => Response::Game(manager.apply_move(chat, &game_id, requester, cell)?),
        Request::Surrender {
            chat,
            game_id,
            requester,
        } => {
            let winner = manager.surrender(chat, &game_id, requester)?;
            Response::Surrendered { game_id, winner }
        }
    };
    debug!(?response, "Request dispatched");
    Ok(response)
}
