//! Piece generation
//!
//! The default rule draws each kind independently with equal probability, so
//! repeats and droughts are possible. The 7-bag rule (all 7 kinds shuffled,
//! dealt out, then reshuffled) is available but only when asked for.

use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How the next kind is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnRule {
    /// Every kind has probability 1/7 on every draw
    #[default]
    Uniform,
    /// Shuffled bags of all 7 kinds
    Bag,
}

/// Produces the pieces that enter the board
#[derive(Debug, Clone)]
pub struct Spawner {
    rule: SpawnRule,
    rng: ChaCha8Rng,
    /// Remaining kinds of the current bag, dealt from the back
    bag: Vec<TetrominoType>,
    board_width: usize,
}

impl Spawner {
    /// Create a spawner with a deterministic seed
    pub fn new(rule: SpawnRule, seed: u64, board_width: usize) -> Self {
        Self {
            rule,
            rng: ChaCha8Rng::seed_from_u64(seed),
            bag: Vec::with_capacity(7),
            board_width,
        }
    }

    pub fn rule(&self) -> SpawnRule {
        self.rule
    }

    /// Draw the next kind
    pub fn next_type(&mut self) -> TetrominoType {
        match self.rule {
            SpawnRule::Uniform => {
                let index = self.rng.gen_range(0..TetrominoType::ALL.len());
                TetrominoType::ALL[index]
            }
            SpawnRule::Bag => loop {
                match self.bag.pop() {
                    Some(kind) => break kind,
                    None => self.refill(),
                }
            },
        }
    }

    /// Draw the next piece at the spawn position
    pub fn next(&mut self) -> Piece {
        Piece::spawn(self.next_type(), self.board_width)
    }

    /// Refill the bag with a new shuffled set
    fn refill(&mut self) {
        self.bag.extend(TetrominoType::all());
        self.bag.shuffle(&mut self.rng);
    }
}
