//! The session state table.
//!
//! Plain data plus the legality rules for every request. The table does
//! no locking and no logging; [`SessionManager`](super::SessionManager)
//! owns it behind a mutex. Each operation checks everything it needs
//! before its first write, so a rejected request leaves the table as it
//! was.

use super::error::SessionError;
use super::ids::GameIdGenerator;
use super::types::{ChatScope, Game, GameId, Invitation, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Draws before [`SessionError::GameIdExhausted`].
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Where the one-engagement-per-participant rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusivityScope {
    /// One game or invitation per participant in each chat.
    #[default]
    PerChat,
    /// One game or invitation per participant across all chats.
    Global,
}

impl ExclusivityScope {
    fn key(self, chat: ChatScope, participant: ParticipantId) -> EngagementKey {
        match self {
            ExclusivityScope::PerChat => (Some(chat), participant),
            ExclusivityScope::Global => (None, participant),
        }
    }
}

type GameKey = (ChatScope, GameId);
type EngagementKey = (Option<ChatScope>, ParticipantId);

#[derive(Debug)]
struct ActiveGame {
    game: Game,
    last_activity: Instant,
}

/// Something the idle sweep removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweptEntry {
    /// Chat it lived in.
    pub chat: ChatScope,
    /// Its id.
    pub game_id: GameId,
    /// Participants freed by the removal.
    pub participants: Vec<ParticipantId>,
    /// `true` for a started game, `false` for an invitation.
    pub was_started: bool,
}

/// Table sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionStats {
    /// Pending invitations.
    pub invitations: usize,
    /// Games in progress.
    pub games: usize,
    /// Participants currently hosting or playing.
    pub engaged: usize,
}

#[derive(Debug, Default)]
pub(crate) struct SessionTable {
    scope: ExclusivityScope,
    invitations: HashMap<GameKey, Invitation>,
    games: HashMap<GameKey, ActiveGame>,
    engaged: HashMap<EngagementKey, GameKey>,
}

impl SessionTable {
    pub(crate) fn new(scope: ExclusivityScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub(crate) fn scope(&self) -> ExclusivityScope {
        self.scope
    }

    fn is_engaged(&self, chat: ChatScope, participant: ParticipantId) -> bool {
        self.engaged
            .contains_key(&self.scope.key(chat, participant))
    }

    fn engage(&mut self, participant: ParticipantId, game: &GameKey) {
        let key = self.scope.key(game.0, participant);
        self.engaged.insert(key, game.clone());
    }

    /// Frees `participant` if their engagement points at `game`.
    fn release(&mut self, participant: ParticipantId, game: &GameKey) {
        let key = self.scope.key(game.0, participant);
        if self.engaged.get(&key) == Some(game) {
            self.engaged.remove(&key);
        }
    }

    fn id_in_use(&self, key: &GameKey) -> bool {
        self.invitations.contains_key(key) || self.games.contains_key(key)
    }

    pub(crate) fn create_invitation(
        &mut self,
        chat: ChatScope,
        host: ParticipantId,
        ids: &dyn GameIdGenerator,
        now: Instant,
    ) -> Result<GameId, SessionError> {
        if self.is_engaged(chat, host) {
            return Err(SessionError::AlreadyInGame(host));
        }
        let key = (0..MAX_ID_ATTEMPTS)
            .map(|_| (chat, ids.next_id()))
            .find(|key| !self.id_in_use(key))
            .ok_or(SessionError::GameIdExhausted {
                attempts: MAX_ID_ATTEMPTS,
            })?;

        let game_id = key.1.clone();
        self.engage(host, &key);
        self.invitations
            .insert(key, Invitation::new(chat, game_id.clone(), host, now));
        Ok(game_id)
    }

    pub(crate) fn cancel_invitation(
        &mut self,
        chat: ChatScope,
        game_id: &GameId,
        requester: ParticipantId,
    ) -> Result<Invitation, SessionError> {
        let key = (chat, game_id.clone());
        match self.invitations.get(&key) {
            None => return Err(SessionError::InvitationNotFound(game_id.clone())),
            Some(invitation) if *invitation.host() != requester => {
                return Err(SessionError::NotAuthorized(requester));
            }
            Some(_) => {}
        }

        let invitation = self
            .invitations
            .remove(&key)
            .ok_or_else(|| SessionError::InvitationNotFound(game_id.clone()))?;
        self.release(*invitation.host(), &key);
        Ok(invitation)
    }

    pub(crate) fn join(
        &mut self,
        chat: ChatScope,
        game_id: &GameId,
        joiner: ParticipantId,
        now: Instant,
    ) -> Result<Game, SessionError> {
        let key = (chat, game_id.clone());
        let host = match self.invitations.get(&key) {
            Some(invitation) => *invitation.host(),
            None => return Err(SessionError::InvitationNotFound(game_id.clone())),
        };
        if joiner == host {
            return Err(SessionError::SelfJoin(joiner));
        }
        if self.is_engaged(chat, joiner) {
            return Err(SessionError::AlreadyInGame(joiner));
        }

        self.invitations.remove(&key);
        let game = Game::started(chat, game_id.clone(), host, joiner);
        self.engage(joiner, &key);
        self.games.insert(
            key,
            ActiveGame {
                game: game.clone(),
                last_activity: now,
            },
        );
        Ok(game)
    }

    pub(crate) fn apply_move(
        &mut self,
        chat: ChatScope,
        game_id: &GameId,
        requester: ParticipantId,
        cell: i64,
        now: Instant,
    ) -> Result<Game, SessionError> {
        let key = (chat, game_id.clone());
        let active = self
            .games
            .get_mut(&key)
            .ok_or_else(|| SessionError::GameNotFound(game_id.clone()))?;

        let verdict = active.game.play(requester, cell)?;
        active.last_activity = now;
        let snapshot = active.game.clone();

        if verdict.is_terminal() {
            self.finish(&key);
        }
        Ok(snapshot)
    }

    pub(crate) fn surrender(
        &mut self,
        chat: ChatScope,
        game_id: &GameId,
        requester: ParticipantId,
    ) -> Result<(ParticipantId, Game), SessionError> {
        let key = (chat, game_id.clone());
        let active = self
            .games
            .get_mut(&key)
            .ok_or_else(|| SessionError::GameNotFound(game_id.clone()))?;
        let (winner_mark, winner) = active
            .game
            .players()
            .opponent_of(requester)
            .ok_or(SessionError::NotAParticipant(requester))?;

        active.game.surrender_to(winner_mark);
        let snapshot = active.game.clone();
        self.finish(&key);
        Ok((winner, snapshot))
    }

    /// Removes a game and frees both seats.
    fn finish(&mut self, key: &GameKey) {
        if let Some(active) = self.games.remove(key) {
            for participant in active.game.players().all() {
                self.release(participant, key);
            }
        }
    }

    pub(crate) fn game(&self, chat: ChatScope, game_id: &GameId) -> Option<Game> {
        let key = (chat, game_id.clone());
        self.games
            .get(&key)
            .map(|active| active.game.clone())
            .or_else(|| self.invitations.get(&key).map(Invitation::as_game))
    }

    pub(crate) fn engagement(
        &self,
        chat: ChatScope,
        participant: ParticipantId,
    ) -> Option<(ChatScope, GameId)> {
        self.engaged
            .get(&self.scope.key(chat, participant))
            .cloned()
    }

    pub(crate) fn sweep_idle(&mut self, now: Instant, max_idle: Duration) -> Vec<SweptEntry> {
        let is_idle = |since: Instant| now.saturating_duration_since(since) > max_idle;

        let stale_invitations: Vec<GameKey> = self
            .invitations
            .iter()
            .filter(|(_, invitation)| is_idle(*invitation.created_at()))
            .map(|(key, _)| key.clone())
            .collect();
        let stale_games: Vec<GameKey> = self
            .games
            .iter()
            .filter(|(_, active)| is_idle(active.last_activity))
            .map(|(key, _)| key.clone())
            .collect();

        let mut swept = Vec::with_capacity(stale_invitations.len() + stale_games.len());
        for key in stale_invitations {
            if let Some(invitation) = self.invitations.remove(&key) {
                self.release(*invitation.host(), &key);
                swept.push(SweptEntry {
                    chat: key.0,
                    game_id: key.1,
                    participants: vec![*invitation.host()],
                    was_started: false,
                });
            }
        }
        for key in stale_games {
            if let Some(active) = self.games.get(&key) {
                let participants: Vec<_> = active.game.players().all().collect();
                self.finish(&key);
                swept.push(SweptEntry {
                    chat: key.0,
                    game_id: key.1,
                    participants,
                    was_started: true,
                });
            }
        }
        swept
    }

    pub(crate) fn stats(&self) -> SessionStats {
        SessionStats {
            invitations: self.invitations.len(),
            games: self.games.len(),
            engaged: self.engaged.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ids::SequentialGameIds;

    const CHAT: ChatScope = ChatScope::new(1);

    fn p(id: i64) -> ParticipantId {
        ParticipantId::new(id)
    }

    /// Always returns the same id.
    #[derive(Debug)]
    struct StuckIds;

    impl GameIdGenerator for StuckIds {
        fn next_id(&self) -> GameId {
            GameId::from("SAME")
        }
    }

    #[test]
    fn test_collision_exhausts_attempts() {
        let mut table = SessionTable::default();
        let now = Instant::now();
        table.create_invitation(CHAT, p(1), &StuckIds, now).unwrap();

        let err = table
            .create_invitation(CHAT, p(2), &StuckIds, now)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::GameIdExhausted {
                attempts: MAX_ID_ATTEMPTS
            }
        );
        // the rejected host stays free
        assert_eq!(table.engagement(CHAT, p(2)), None);
        assert_eq!(table.stats().invitations, 1);
    }

    #[test]
    fn test_same_id_allowed_in_other_chat() {
        let mut table = SessionTable::default();
        let now = Instant::now();
        table.create_invitation(CHAT, p(1), &StuckIds, now).unwrap();
        let id = table
            .create_invitation(ChatScope::new(2), p(2), &StuckIds, now)
            .unwrap();
        assert_eq!(id, GameId::from("SAME"));
    }

    #[test]
    fn test_release_ignores_other_engagements() {
        let mut table = SessionTable::new(ExclusivityScope::Global);
        let ids = SequentialGameIds::new();
        let now = Instant::now();
        let g1 = table.create_invitation(CHAT, p(1), &ids, now).unwrap();

        table.release(p(1), &(ChatScope::new(9), g1.clone()));
        assert_eq!(table.engagement(CHAT, p(1)), Some((CHAT, g1)));
    }

    #[test]
    fn test_stats_track_lifecycle() {
        let mut table = SessionTable::default();
        let ids = SequentialGameIds::new();
        let now = Instant::now();
        let id = table.create_invitation(CHAT, p(1), &ids, now).unwrap();
        assert_eq!(
            table.stats(),
            SessionStats {
                invitations: 1,
                games: 0,
                engaged: 1
            }
        );

        table.join(CHAT, &id, p(2), now).unwrap();
        assert_eq!(
            table.stats(),
            SessionStats {
                invitations: 0,
                games: 1,
                engaged: 2
            }
        );

        table.surrender(CHAT, &id, p(2)).unwrap();
        assert_eq!(table.stats(), SessionStats::default());
    }
}
