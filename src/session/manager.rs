//! Shared handle over the session table.

use super::error::SessionError;
use super::ids::{GameIdGenerator, RandomGameIds};
use super::table::{ExclusivityScope, SessionStats, SessionTable, SweptEntry};
use super::types::{ChatScope, Game, GameId, ParticipantId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Manages every invitation and game the bot knows about.
///
/// Cloning is cheap and every clone sees the same table. Each operation
/// runs in one critical section and hands back an owned snapshot; outcome
/// logging happens after the lock is released.
#[derive(Debug, Clone)]
pub struct SessionManager {
    table: Arc<Mutex<SessionTable>>,
    ids: Arc<dyn GameIdGenerator>,
}

impl SessionManager {
    /// Manager with random ids and per-chat exclusivity.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::with_ids(RandomGameIds::default())
    }

    /// Manager drawing game ids from `ids`, per-chat exclusivity.
    pub fn with_ids(ids: impl GameIdGenerator + 'static) -> Self {
        Self::scoped(ids, ExclusivityScope::default())
    }

    /// Manager drawing game ids from `ids` under `scope`.
    ///
    /// The scope is fixed for the manager's lifetime and shared by every clone.
    pub fn scoped(ids: impl GameIdGenerator + 'static, scope: ExclusivityScope) -> Self {
        Self {
            table: Arc::new(Mutex::new(SessionTable::new(scope))),
            ids: Arc::new(ids),
        }
    }

    /// Scope of the one-engagement rule.
    pub fn exclusivity(&self) -> ExclusivityScope {
        self.lock().scope()
    }

    /// No operation leaves the table half-written, so a panic elsewhere
    /// does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, SessionTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Posts an invitation hosted by `host`, who will play X.
    #[instrument(skip(self), fields(chat = %chat, host = %host))]
    pub fn create_invitation(
        &self,
        chat: ChatScope,
        host: ParticipantId,
    ) -> Result<GameId, SessionError> {
        let result = self
            .lock()
            .create_invitation(chat, host, self.ids.as_ref(), Instant::now());
        match &result {
            Ok(game_id) => info!(game_id = %game_id, "Invitation created"),
            Err(e) => warn!(error = %e, kind = e.kind(), "Invitation rejected"),
        }
        result
    }

    /// Withdraws a pending invitation. Only its host may do this.
    #[instrument(skip(self), fields(chat = %chat, game_id = %game_id, requester = %requester))]
    pub fn cancel_invitation(
        &self,
        chat: ChatScope,
        game_id: &GameId,
        requester: ParticipantId,
    ) -> Result<(), SessionError> {
        let result = self.lock().cancel_invitation(chat, game_id, requester);
        match result {
            Ok(_) => {
                info!("Invitation cancelled");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Cancel rejected");
                Err(e)
            }
        }
    }

    /// Accepts an invitation. The joiner plays O and X moves first.
    #[instrument(skip(self), fields(chat = %chat, game_id = %game_id, joiner = %joiner))]
    pub fn join_game(
        &self,
        chat: ChatScope,
        game_id: &GameId,
        joiner: ParticipantId,
    ) -> Result<Game, SessionError> {
        let result = self.lock().join(chat, game_id, joiner, Instant::now());
        match &result {
            Ok(game) => info!(host = ?game.players().get(xo_rules::Mark::X), "Game started"),
            Err(e) => warn!(error = %e, kind = e.kind(), "Join rejected"),
        }
        result
    }

    /// Places the requester's mark on `cell` (0-8, row-major).
    ///
    /// A move that ends the game removes it and frees both participants;
    /// the returned snapshot then carries the terminal status.
    #[instrument(skip(self), fields(chat = %chat, game_id = %game_id, requester = %requester))]
    pub fn apply_move(
        &self,
        chat: ChatScope,
        game_id: &GameId,
        requester: ParticipantId,
        cell: i64,
    ) -> Result<Game, SessionError> {
        let result = self
            .lock()
            .apply_move(chat, game_id, requester, cell, Instant::now());
        match &result {
            Ok(game) if game.status().is_terminal() => {
                info!(status = ?game.status(), winner = ?game.winner(), "Game finished");
                debug!(board = %game.board(), "Final board");
            }
            Ok(game) => debug!(next = %game.current_mark(), board = %game.board(), "Move applied"),
            Err(e) => warn!(error = %e, kind = e.kind(), "Move rejected"),
        }
        result
    }

    /// Concedes the game. Returns the winner.
    #[instrument(skip(self), fields(chat = %chat, game_id = %game_id, requester = %requester))]
    pub fn surrender(
        &self,
        chat: ChatScope,
        game_id: &GameId,
        requester: ParticipantId,
    ) -> Result<ParticipantId, SessionError> {
        let result = self.lock().surrender(chat, game_id, requester);
        match result {
            Ok((winner, game)) => {
                info!(winner = %winner, status = ?game.status(), "Game surrendered");
                Ok(winner)
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Surrender rejected");
                Err(e)
            }
        }
    }

    /// Snapshot of a running game or pending invitation.
    #[instrument(skip(self))]
    pub fn game(&self, chat: ChatScope, game_id: &GameId) -> Option<Game> {
        let game = self.lock().game(chat, game_id);
        if game.is_none() {
            debug!("Game not found");
        }
        game
    }

    /// The game or invitation currently holding `participant`.
    ///
    /// With [`ExclusivityScope::Global`] the answer may live in another chat.
    pub fn engagement(
        &self,
        chat: ChatScope,
        participant: ParticipantId,
    ) -> Option<(ChatScope, GameId)> {
        self.lock().engagement(chat, participant)
    }

    /// Drops invitations and games idle for longer than `max_idle`.
    #[instrument(skip(self))]
    pub fn sweep_idle(&self, now: Instant, max_idle: Duration) -> Vec<SweptEntry> {
        let swept = self.lock().sweep_idle(now, max_idle);
        for entry in &swept {
            info!(
                chat = %entry.chat,
                game_id = %entry.game_id,
                was_started = entry.was_started,
                participants = ?entry.participants,
                "Swept idle entry"
            );
        }
        swept
    }

    /// Current table sizes.
    pub fn stats(&self) -> SessionStats {
        self.lock().stats()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
