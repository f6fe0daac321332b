//! Draw detection logic for tic-tac-toe.

use super::win::check_winner;
use crate::{Board, Square};

/// Checks if the board is full (all squares occupied).
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no winner.
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mark, Position};

    fn fill(board: &mut Board, layout: [Mark; 9]) {
        for (pos, mark) in Position::ALL.into_iter().zip(layout) {
            board.place(pos, mark).unwrap();
        }
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X).unwrap();
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_draw_detection() {
        use Mark::{O, X};
        // X O X / O X X / O X O
        let mut board = Board::new();
        fill(&mut board, [X, O, X, O, X, X, O, X, O]);
        assert!(is_full(&board));
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_line_is_not_draw() {
        use Mark::{O, X};
        // X X X / O O X / X O O
        let mut board = Board::new();
        fill(&mut board, [X, X, X, O, O, X, X, O, O]);
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
