//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Win is always checked before draw,
//! so a full board that also completes a line is a win.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};

use crate::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a board after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Neither mark has won and squares remain.
    Ongoing,
    /// A mark completed a line.
    Won(Mark),
    /// Full board, no line.
    Draw,
}

impl Verdict {
    /// True for `Won` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Verdict::Ongoing)
    }
}

/// Evaluates the board: win first, then draw.
#[instrument(level = "trace", skip(board), fields(occupied = board.occupied_count()))]
pub fn evaluate(board: &Board) -> Verdict {
    if let Some(mark) = check_winner(board) {
        Verdict::Won(mark)
    } else if is_full(board) {
        Verdict::Draw
    } else {
        Verdict::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_evaluate_ongoing() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X).unwrap();
        assert_eq!(evaluate(&board), Verdict::Ongoing);
        assert!(!evaluate(&board).is_terminal());
    }

    #[test]
    fn test_evaluate_prefers_win_on_full_board() {
        use Mark::{O, X};
        let mut board = Board::new();
        for (pos, mark) in Position::ALL.into_iter().zip([X, X, X, O, O, X, X, O, O]) {
            board.place(pos, mark).unwrap();
        }
        assert_eq!(evaluate(&board), Verdict::Won(X));
    }
}
