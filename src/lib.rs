//! TETRS rules engine
//!
//! Board, pieces, gravity, line clears and progression for a falling-block
//! puzzle game. Hosts feed it discrete commands and a periodic `tick`, read
//! its state to draw, and drain its events to react.

pub mod board;
pub mod game;
pub mod piece;
pub mod rewards;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod spawner;
pub mod tetromino;

pub use board::{Board, Cell};
pub use game::{Action, Game, GameEvent, GameState, Rules};
pub use piece::Piece;
pub use rewards::Rewards;
pub use score::{Progression, Score};
pub use settings::{Settings, SettingsError};
pub use snapshot::Snapshot;
pub use spawner::{SpawnRule, Spawner};
pub use tetromino::{Color, Rotation, ShapeMatrix, TetrominoType, rotate_matrix, shape_matrix};
