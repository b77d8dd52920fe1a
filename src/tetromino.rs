//! Tetromino definitions and shapes
//!
//! The 7 piece kinds, their canonical colors, and the shape matrices every
//! orientation is derived from. Rotation is a pure transform over a matrix;
//! the base shapes are never touched.

use serde::{Deserialize, Serialize};

/// An RGB color carried by pieces and locked cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    Z, // Red
    T, // Purple
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::Z,
        TetrominoType::T,
    ];

    /// Get the canonical color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::CYAN,
            TetrominoType::J => Color::BLUE,
            TetrominoType::L => Color::ORANGE,
            TetrominoType::O => Color::YELLOW,
            TetrominoType::S => Color::GREEN,
            TetrominoType::Z => Color::RED,
            TetrominoType::T => Color::PURPLE,
        }
    }

    /// Get all tetromino types
    pub fn all() -> [TetrominoType; 7] {
        Self::ALL
    }

    /// Single-letter name, used in logs
    pub fn letter(&self) -> char {
        match self {
            TetrominoType::I => 'I',
            TetrominoType::J => 'J',
            TetrominoType::L => 'L',
            TetrominoType::O => 'O',
            TetrominoType::S => 'S',
            TetrominoType::Z => 'Z',
            TetrominoType::T => 'T',
        }
    }

    /// The spawn orientation of this kind
    pub fn base_matrix(&self) -> ShapeMatrix {
        let rows: &[&[u8]] = match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::T => &[&[0, 1, 0], &[1, 1, 1]],
        };
        ShapeMatrix::from_rows(rows)
    }

    /// Get the shape matrix for this tetromino at a given rotation
    pub fn shape(&self, rotation: Rotation) -> ShapeMatrix {
        shape_matrix(*self, rotation)
    }
}

/// Rotation states, clockwise from spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North, // Spawn state
    East,  // Clockwise from North
    South, // 180 from North
    West,  // Counter-clockwise from North
}

impl Rotation {
    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(&self) -> Rotation {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Number of clockwise quarter turns from North (0..=3)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build a rotation from any number of quarter turns, taken modulo 4
    pub fn from_index(index: u8) -> Rotation {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// A boolean cell layout, stored row-major with row 0 at the top
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: Vec<Vec<bool>>,
}

impl ShapeMatrix {
    fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// (row, col) of every filled cell, relative to the top-left corner
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &filled)| filled)
                .map(move |(c, _)| (r, c))
        })
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }
}

/// Rotate a matrix 90° clockwise: transpose, then reverse each row
pub fn rotate_matrix(matrix: &ShapeMatrix) -> ShapeMatrix {
    let height = matrix.height();
    let width = matrix.width();
    let mut rows = vec![vec![false; height]; width];
    for (r, row) in matrix.rows.iter().enumerate() {
        for (c, &filled) in row.iter().enumerate() {
            rows[c][height - 1 - r] = filled;
        }
    }
    ShapeMatrix { rows }
}

/// The matrix of `kind` after `rotation` quarter turns from its base shape
pub fn shape_matrix(kind: TetrominoType, rotation: Rotation) -> ShapeMatrix {
    let mut matrix = kind.base_matrix();
    for _ in 0..rotation.index() {
        matrix = rotate_matrix(&matrix);
    }
    matrix
}
