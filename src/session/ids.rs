//! Game id generation.

use super::types::GameId;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Letters and digits that can't be confused with each other (no I, O, 0, 1).
pub const GAME_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default token length: 32^6, about a billion ids.
pub const DEFAULT_GAME_ID_LENGTH: usize = 6;

/// Longest accepted token.
pub const MAX_GAME_ID_LENGTH: usize = 32;

/// Source of fresh game ids.
///
/// The session manager checks each id against live games in the chat and
/// draws again on collision, so implementations need not guarantee
/// uniqueness.
pub trait GameIdGenerator: Send + Sync + std::fmt::Debug {
    /// Produces the next candidate id.
    fn next_id(&self) -> GameId;
}

/// Random tokens over [`GAME_ID_ALPHABET`].
#[derive(Debug, Clone, Copy)]
pub struct RandomGameIds {
    length: usize,
}

impl RandomGameIds {
    /// Tokens of `length` characters, clamped to `1..=MAX_GAME_ID_LENGTH`.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, MAX_GAME_ID_LENGTH),
        }
    }
}

impl Default for RandomGameIds {
    fn default() -> Self {
        Self::new(DEFAULT_GAME_ID_LENGTH)
    }
}

impl GameIdGenerator for RandomGameIds {
    fn next_id(&self) -> GameId {
        let mut rng = rand::rng();
        let token: String = (0..self.length)
            .map(|_| GAME_ID_ALPHABET[rng.random_range(0..GAME_ID_ALPHABET.len())] as char)
            .collect();
        GameId::from(token)
    }
}

/// Deterministic ids `G1`, `G2`, ...
#[derive(Debug, Default)]
pub struct SequentialGameIds {
    next: AtomicU64,
}

impl SequentialGameIds {
    /// Starts at `G1`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameIdGenerator for SequentialGameIds {
    fn next_id(&self) -> GameId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        GameId::from(format!("G{n}"))
    }
}
