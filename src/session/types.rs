//! Identifiers, game snapshots and invitations.

use super::error::SessionError;
use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use xo_rules::{Board, Mark, Position, Verdict};

/// Conversation in which games and invitations are identified.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChatScope(i64);

impl ChatScope {
    /// Wraps a raw chat id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw chat id.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// A chat participant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Wraps a raw user id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw user id.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Short token naming a game within a chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Returns the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Invitation posted, nobody has joined.
    WaitingForOpponent,
    /// Both seats taken, moves are accepted.
    InProgress,
    /// A mark completed a line.
    Won(Mark),
    /// Full board without a line.
    Draw,
    /// One participant gave up; holds the winner's mark.
    Surrendered(Mark),
}

impl GameStatus {
    /// `Won`, `Draw` and `Surrendered` are final.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Won(_) | GameStatus::Draw | GameStatus::Surrendered(_)
        )
    }
}

/// Mark-to-participant seating. The host always sits at X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    #[serde(rename = "X")]
    x: ParticipantId,
    #[serde(rename = "O", skip_serializing_if = "Option::is_none", default)]
    o: Option<ParticipantId>,
}

impl Players {
    /// Seating with only the host.
    pub fn hosted_by(host: ParticipantId) -> Self {
        Self { x: host, o: None }
    }

    /// Seating for a started game.
    pub fn pair(x: ParticipantId, o: ParticipantId) -> Self {
        Self { x, o: Some(o) }
    }

    /// Participant playing `mark`.
    pub fn get(&self, mark: Mark) -> Option<ParticipantId> {
        match mark {
            Mark::X => Some(self.x),
            Mark::O => self.o,
        }
    }

    /// Mark played by `participant`.
    pub fn mark_of(&self, participant: ParticipantId) -> Option<Mark> {
        if participant == self.x {
            Some(Mark::X)
        } else if self.o == Some(participant) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The seated opponent of `participant`, with their mark.
    pub fn opponent_of(&self, participant: ParticipantId) -> Option<(Mark, ParticipantId)> {
        let theirs = self.mark_of(participant)?.opponent();
        self.get(theirs).map(|id| (theirs, id))
    }

    /// Everyone seated, X first.
    pub fn all(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        std::iter::once(self.x).chain(self.o)
    }
}

/// Renderable snapshot of a game.
///
/// Snapshots are cloned out of the session table, so holding one never
/// blocks other requests.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Game {
    /// Chat the game lives in.
    chat: ChatScope,
    /// Token naming the game within its chat.
    id: GameId,
    /// The board.
    board: Board,
    /// Who plays which mark.
    players: Players,
    /// Mark that moves next.
    current_mark: Mark,
    /// Lifecycle status.
    status: GameStatus,
}

impl Game {
    pub(crate) fn waiting(chat: ChatScope, id: GameId, host: ParticipantId) -> Self {
        Self {
            chat,
            id,
            board: Board::new(),
            players: Players::hosted_by(host),
            current_mark: Mark::X,
            status: GameStatus::WaitingForOpponent,
        }
    }

    pub(crate) fn started(
        chat: ChatScope,
        id: GameId,
        host: ParticipantId,
        joiner: ParticipantId,
    ) -> Self {
        Self {
            players: Players::pair(host, joiner),
            status: GameStatus::InProgress,
            ..Self::waiting(chat, id, host)
        }
    }

    /// Participant owed the next move.
    pub fn current_participant(&self) -> Option<ParticipantId> {
        self.players.get(self.current_mark)
    }

    /// Winner of a won or surrendered game.
    pub fn winner(&self) -> Option<ParticipantId> {
        match self.status {
            GameStatus::Won(mark) | GameStatus::Surrendered(mark) => self.players.get(mark),
            _ => None,
        }
    }

    /// Validates and applies one move.
    ///
    /// Nothing is written unless every check passes.
    pub(crate) fn play(
        &mut self,
        requester: ParticipantId,
        cell: i64,
    ) -> Result<Verdict, SessionError> {
        let mark = self.current_mark;
        if self.status != GameStatus::InProgress || self.players.get(mark) != Some(requester) {
            return Err(SessionError::NotYourTurn {
                requester,
                expected: mark,
            });
        }
        let pos = usize::try_from(cell)
            .ok()
            .and_then(Position::from_index)
            .ok_or(SessionError::InvalidCell { cell })?;
        self.board
            .place(pos, mark)
            .map_err(|_| SessionError::InvalidCell { cell })?;

        let verdict = xo_rules::evaluate(&self.board);
        match verdict {
            Verdict::Ongoing => self.current_mark = mark.opponent(),
            Verdict::Won(winner) => self.status = GameStatus::Won(winner),
            Verdict::Draw => self.status = GameStatus::Draw,
        }
        Ok(verdict)
    }

    pub(crate) fn surrender_to(&mut self, winner: Mark) {
        self.status = GameStatus::Surrendered(winner);
    }
}

/// Pending, unmatched game awaiting a second participant.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct Invitation {
    /// Chat the invitation was posted in.
    chat: ChatScope,
    /// Id the game will carry once joined.
    game_id: GameId,
    /// Participant who posted it.
    host: ParticipantId,
    /// When it was posted.
    created_at: Instant,
}

impl Invitation {
    /// Snapshot of the game this invitation will become.
    pub fn as_game(&self) -> Game {
        Game::waiting(self.chat, self.game_id.clone(), self.host)
    }
}
