//! The active falling piece as a plain value
//!
//! Movement never happens in place: the engine derives a candidate with
//! `shifted`/`rotated`, asks the board whether it fits, and keeps it or drops it.

use crate::tetromino::{Color, Rotation, ShapeMatrix, TetrominoType, shape_matrix};
use serde::{Deserialize, Serialize};

/// A tetromino placed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Current rotation state
    pub rotation: Rotation,
    /// Column of the shape matrix's top-left corner
    pub x: i32,
    /// Row of the shape matrix's top-left corner, row 0 is the top of the board
    pub y: i32,
    /// Color written into the board when this piece locks
    pub color: Color,
}

impl Piece {
    /// Create a piece in its spawn rotation with the kind's canonical color
    pub fn new(piece_type: TetrominoType, x: i32, y: i32) -> Self {
        Self {
            piece_type,
            rotation: Rotation::North,
            x,
            y,
            color: piece_type.color(),
        }
    }

    /// Create a piece at the spawn position: horizontally centered, top row
    pub fn spawn(piece_type: TetrominoType, board_width: usize) -> Self {
        let x = (board_width / 2) as i32 - 2;
        Self::new(piece_type, x, 0)
    }

    /// Shape matrix for the current rotation
    pub fn matrix(&self) -> ShapeMatrix {
        shape_matrix(self.piece_type, self.rotation)
    }

    /// Absolute (row, col) of every filled cell
    pub fn cells(&self) -> Vec<(i32, i32)> {
        self.matrix()
            .filled()
            .map(|(r, c)| (self.y + r as i32, self.x + c as i32))
            .collect()
    }

    /// A copy moved by `dx` columns and `dy` rows
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// A copy turned one quarter clockwise around the same top-left corner
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.cw(),
            ..*self
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(TetrominoType::T, 10);
        assert_eq!(piece.x, 3);
        assert_eq!(piece.y, 0);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!(piece.color, Color::PURPLE);
    }

    #[test]
    fn test_cells_are_offset_by_position() {
        let piece = Piece::new(TetrominoType::O, 4, 2);
        let mut cells = piece.cells();
        cells.sort();
        assert_eq!(cells, vec![(2, 4), (2, 5), (3, 4), (3, 5)]);
    }

    #[test]
    fn test_shifted_leaves_original() {
        let piece = Piece::new(TetrominoType::L, 3, 0);
        let moved = piece.shifted(-1, 2);
        assert_eq!((piece.x, piece.y), (3, 0));
        assert_eq!((moved.x, moved.y), (2, 2));
        assert_eq!(moved.rotation, piece.rotation);
    }

    #[test]
    fn test_rotated_wraps_after_four_turns() {
        let piece = Piece::new(TetrominoType::S, 3, 0);
        let turned = piece.rotated().rotated().rotated().rotated();
        assert_eq!(turned, piece);
        assert_eq!(piece.rotated().rotation, Rotation::East);
    }
}
