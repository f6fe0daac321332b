//! Session error types.

use super::types::{GameId, ParticipantId};
use derive_more::Display;
use xo_rules::Mark;

/// Rejected session request.
///
/// Every variant is an expected outcome the caller reports back to the
/// participant. A rejected request never changes session state.
#[derive(Debug, Clone, PartialEq, Eq, Display, strum::IntoStaticStr)]
pub enum SessionError {
    /// Participant already hosts an invitation or plays a game.
    #[display("Participant {_0} is already in a game")]
    AlreadyInGame(ParticipantId),

    /// No pending invitation with this id in the chat.
    #[display("Invitation {_0} is no longer valid")]
    InvitationNotFound(GameId),

    /// Host tried to join their own invitation.
    #[display("Participant {_0} can't play against themselves")]
    SelfJoin(ParticipantId),

    /// No active game with this id in the chat.
    #[display("Game {_0} not found or already over")]
    GameNotFound(GameId),

    /// Requester does not hold the mark that moves next.
    #[display("It's not {requester}'s turn, {expected} moves next")]
    NotYourTurn {
        /// Who tried to move.
        requester: ParticipantId,
        /// Mark owed the move.
        expected: Mark,
    },

    /// Cell is outside 0-8 (negative included) or already occupied.
    #[display("Cell {cell} is not a valid move")]
    InvalidCell {
        /// Requested cell index.
        cell: i64,
    },

    /// Only the host may cancel an invitation.
    #[display("Participant {_0} may not cancel this invitation")]
    NotAuthorized(ParticipantId),

    /// Requester is not seated in the game.
    #[display("Participant {_0} is not in this game")]
    NotAParticipant(ParticipantId),

    /// The id generator kept producing ids already live in the chat.
    #[display("No unused game id after {attempts} attempts")]
    GameIdExhausted {
        /// Ids drawn before giving up.
        attempts: usize,
    },
}

impl SessionError {
    /// Stable variant name, e.g. `"AlreadyInGame"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_variant_name() {
        assert_eq!(
            SessionError::AlreadyInGame(ParticipantId::new(1)).kind(),
            "AlreadyInGame"
        );
        assert_eq!(SessionError::InvalidCell { cell: 9 }.kind(), "InvalidCell");
    }

    #[test]
    fn test_display_names_the_turn_holder() {
        let err = SessionError::NotYourTurn {
            requester: ParticipantId::new(7),
            expected: Mark::O,
        };
        assert_eq!(err.to_string(), "It's not 7's turn, O moves next");
    }
}
