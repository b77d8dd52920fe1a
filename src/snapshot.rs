//! Read-only view of a game for renderers and exporters

use crate::game::GameState;
use crate::piece::Piece;
use crate::tetromino::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rows top to bottom; `None` is an empty cell
    pub board: Vec<Vec<Option<Color>>>,
    pub current: Piece,
    pub next: Piece,
    /// Row the current piece would land on
    pub ghost_y: i32,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub lock_count: u64,
    pub fall_interval_ms: u64,
    pub state: GameState,
}

impl Snapshot {
    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Board rows as text, `.` for empty and `#` for filled
    pub fn board_text(&self) -> String {
        let width = self.board.first().map_or(0, Vec::len);
        let mut out = String::with_capacity(self.board.len() * (width + 1));
        for row in &self.board {
            for cell in row {
                out.push(if cell.is_some() { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}
