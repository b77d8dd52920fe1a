//! Game board representation and collision detection

use crate::piece::Piece;
use crate::tetromino::Color;
use serde::{Deserialize, Serialize};

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(*color),
        }
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as [row][col], row 0 is the top
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        let (row, col) = self.index(row, col)?;
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match self.index(row, col) {
            Some((row, col)) => {
                self.cells[row][col] = cell;
                true
            }
            None => false,
        }
    }

    fn index(&self, row: i32, col: i32) -> Option<(usize, usize)> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some((row, col))
    }

    /// Check a single cell for a piece block.
    /// Rows above the top are open unless a side wall is hit.
    pub fn is_valid_position(&self, row: i32, col: i32) -> bool {
        if col < 0 || col >= self.width as i32 {
            return false;
        }
        if row >= self.height as i32 {
            return false;
        }
        if row < 0 {
            return true;
        }
        self.cells[row as usize][col as usize].is_empty()
    }

    /// Whether every filled cell of `piece` is inside the walls, above the
    /// floor, and not overlapping a locked cell
    pub fn is_valid(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .into_iter()
            .all(|(row, col)| self.is_valid_position(row, col))
    }

    /// Write the piece's color into the board. Cells above row 0 are dropped.
    pub fn lock(&mut self, piece: &Piece) {
        for (row, col) in piece.cells() {
            self.set(row, col, Cell::Filled(piece.color));
        }
    }

    /// Remove every full row and return how many were removed.
    ///
    /// Scans bottom to top; after a removal the same index is checked again
    /// since the row above has moved into it.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut row = self.height;
        while row > 0 {
            if self.is_row_full(row - 1) {
                self.cells.remove(row - 1);
                self.cells.insert(0, vec![Cell::Empty; self.width]);
                cleared += 1;
            } else {
                row -= 1;
            }
        }
        cleared
    }

    /// Check if a row is completely filled. A zero-width row is never full.
    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells.get(row).is_some_and(|cells| {
            !cells.is_empty() && cells.iter().all(|cell| cell.is_filled())
        })
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_filled()).count())
            .sum()
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Height of each column, measured from the floor to its highest filled cell
    pub fn column_heights(&self) -> Vec<usize> {
        (0..self.width)
            .map(|col| {
                self.cells
                    .iter()
                    .position(|row| row[col].is_filled())
                    .map_or(0, |top| self.height - top)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;

    fn fill_row(board: &mut Board, row: i32, color: Color) {
        for col in 0..board.width() as i32 {
            board.set(row, col, Cell::Filled(color));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::default();
        assert!(board.set(5, 5, Cell::Filled(Color::RED)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(Color::RED)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
        assert!(!board.set(-1, 0, Cell::Filled(Color::RED)));
    }

    #[test]
    fn test_is_valid_walls_and_floor() {
        let board = Board::default();
        // I piece is 4 wide
        assert!(board.is_valid(&Piece::new(TetrominoType::I, 0, 0)));
        assert!(board.is_valid(&Piece::new(TetrominoType::I, 6, 0)));
        assert!(!board.is_valid(&Piece::new(TetrominoType::I, -1, 0)));
        assert!(!board.is_valid(&Piece::new(TetrominoType::I, 7, 0)));
        // O piece is 2 tall
        assert!(board.is_valid(&Piece::new(TetrominoType::O, 0, 18)));
        assert!(!board.is_valid(&Piece::new(TetrominoType::O, 0, 19)));
    }

    #[test]
    fn test_is_valid_above_top() {
        let mut board = Board::default();
        assert!(board.is_valid(&Piece::new(TetrominoType::O, 4, -1)));
        assert!(!board.is_valid(&Piece::new(TetrominoType::O, -1, -1)));
        board.set(0, 4, Cell::Filled(Color::RED));
        assert!(!board.is_valid(&Piece::new(TetrominoType::O, 4, -1)));
        assert!(board.is_valid(&Piece::new(TetrominoType::O, 4, -2)));
    }

    #[test]
    fn test_is_valid_overlap() {
        let mut board = Board::default();
        board.set(10, 5, Cell::Filled(Color::RED));
        assert!(!board.is_valid(&Piece::new(TetrominoType::O, 4, 9)));
        assert!(board.is_valid(&Piece::new(TetrominoType::O, 6, 9)));
    }

    #[test]
    fn test_lock_drops_cells_above_top() {
        let mut board = Board::default();
        board.lock(&Piece::new(TetrominoType::O, 4, -1));
        assert_eq!(board.filled_count(), 2);
        assert_eq!(board.get(0, 4), Some(Cell::Filled(Color::YELLOW)));
        assert_eq!(board.get(0, 5), Some(Cell::Filled(Color::YELLOW)));
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        fill_row(&mut board, 19, Color::CYAN);
        board.set(18, 0, Cell::Filled(Color::RED));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared, 1);
        // The block from row 18 should now be on row 19
        assert_eq!(board.get(19, 0), Some(Cell::Filled(Color::RED)));
        assert!(board.get(18, 0).unwrap().is_empty());
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_clear_adjacent_rows_in_one_pass() {
        let mut board = Board::default();
        fill_row(&mut board, 19, Color::CYAN);
        fill_row(&mut board, 18, Color::GREEN);
        fill_row(&mut board, 16, Color::BLUE);
        board.set(17, 3, Cell::Filled(Color::RED));
        board.set(15, 7, Cell::Filled(Color::ORANGE));

        assert_eq!(board.clear_full_rows(), 3);
        // Survivors keep their order and sink by the rows removed beneath them
        assert_eq!(board.get(19, 3), Some(Cell::Filled(Color::RED)));
        assert_eq!(board.get(18, 7), Some(Cell::Filled(Color::ORANGE)));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_clear_nothing() {
        let mut board = Board::default();
        board.set(19, 0, Cell::Filled(Color::RED));
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_zero_width_board_clears_nothing() {
        let mut board = Board::new(0, 20);
        assert!(!board.is_row_full(19));
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.height(), 20);
    }

    #[test]
    fn test_column_heights() {
        let mut board = Board::new(4, 6);
        board.set(5, 0, Cell::Filled(Color::RED));
        board.set(2, 2, Cell::Filled(Color::RED));
        assert_eq!(board.column_heights(), vec![1, 0, 4, 0]);
    }
}
