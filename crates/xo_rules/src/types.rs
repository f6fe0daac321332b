//! Core domain types for tic-tac-toe.

use crate::position::Position;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Mark placed by a participant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
///
/// Serialized as `null`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Mark>", into = "Option<Mark>")]
pub enum Square {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Square {
    fn from(value: Option<Mark>) -> Self {
        value.map_or(Square::Empty, Square::Occupied)
    }
}

impl From<Square> for Option<Mark> {
    fn from(value: Square) -> Self {
        value.mark()
    }
}

/// Error returned when a mark cannot be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, derive_more::Error)]
pub enum PlaceError {
    /// The square already holds a mark.
    #[display("Square {_0} is already occupied")]
    Occupied(#[error(not(source))] Position),
}

/// 3x3 board, squares in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [Square; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the square at `pos`.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Places `mark` on an empty square.
    ///
    /// Occupied squares are never overwritten.
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), PlaceError> {
        let square = &mut self.squares[pos.to_index()];
        if *square != Square::Empty {
            return Err(PlaceError::Occupied(pos));
        }
        *square = Square::Occupied(mark);
        Ok(())
    }

    /// Checks if the square at `pos` is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of squares holding a mark.
    pub fn occupied_count(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Positions that can still be played.
    pub fn valid_moves(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Square::Empty => write!(f, "{}", pos + 1)?,
                    Square::Occupied(mark) => write!(f, "{mark}")?,
                }
                if col < 2 {
                    f.write_str("|")?;
                }
            }
            if row < 2 {
                f.write_str("\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_rejects_occupied_square() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X).expect("empty square");

        let err = board.place(Position::Center, Mark::O).unwrap_err();
        assert_eq!(err, PlaceError::Occupied(Position::Center));
        assert_eq!(board.get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_valid_moves_shrink() {
        let mut board = Board::new();
        assert_eq!(board.valid_moves().len(), 9);
        board.place(Position::TopLeft, Mark::X).unwrap();
        board.place(Position::BottomRight, Mark::O).unwrap();
        let moves = board.valid_moves();
        assert_eq!(moves.len(), 7);
        assert!(!moves.contains(&Position::TopLeft));
        assert!(!moves.contains(&Position::BottomRight));
    }

    #[test]
    fn test_display_grid() {
        let mut board = Board::new();
        board.place(Position::TopLeft, Mark::X).unwrap();
        board.place(Position::Center, Mark::O).unwrap();
        assert_eq!(board.to_string(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_board_serializes_as_nullable_marks() {
        let mut board = Board::new();
        board.place(Position::TopCenter, Mark::O).unwrap();
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!([null, "O", null, null, null, null, null, null, null])
        );
        let back: Board = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }
}
