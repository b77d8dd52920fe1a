//! Core game state and logic

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::piece::Piece;
use crate::score::{Progression, Score};
use crate::snapshot::Snapshot;
use crate::spawner::{SpawnRule, Spawner};
use crate::tetromino::Color;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    Reset,
}

/// Things the presentation and economy layers may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A lock removed this many rows
    LinesCleared(u32),
    /// A piece locked; `lock_count` counts locks since the last reset
    PieceLocked { lock_count: u64 },
    /// The freshly spawned piece did not fit
    GameOver,
}

/// Everything that shapes a game before it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub width: usize,
    pub height: usize,
    pub progression: Progression,
    pub spawn_rule: SpawnRule,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            progression: Progression::default(),
            spawn_rule: SpawnRule::Uniform,
        }
    }
}

/// The main game struct
///
/// Driven entirely from outside: commands and `tick` run to completion on the
/// caller's thread. Share it across threads only behind a single lock.
#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    /// The game board
    board: Board,
    /// Current falling piece
    current: Piece,
    /// Piece that spawns after the current one locks
    next: Piece,
    spawner: Spawner,
    score: Score,
    state: GameState,
    fall_interval: Duration,
    /// Time accumulated towards the next gravity step
    since_fall: Duration,
    /// Locks since the last reset
    lock_count: u64,
    /// Cosmetic color applied to every spawned piece
    color_override: Option<Color>,
    /// Events not yet drained by the host
    events: Vec<GameEvent>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Game {
    /// Create a new game with a random seed
    pub fn new(rules: Rules) -> Self {
        Self::with_seed(rules, rand::random())
    }

    /// Create a new game whose piece sequence is fixed by `seed`
    pub fn with_seed(rules: Rules, seed: u64) -> Self {
        let mut spawner = Spawner::new(rules.spawn_rule, seed, rules.width);
        let current = spawner.next();
        let next = spawner.next();
        let board = Board::new(rules.width, rules.height);
        let mut game = Self::assemble(rules, board, current, next, spawner);
        game.check_spawn();
        game
    }

    /// Resume from an existing position. Level and fall speed start fresh;
    /// the game is over immediately if `current` does not fit on `board`.
    pub fn from_parts(rules: Rules, board: Board, current: Piece, next: Piece, seed: u64) -> Self {
        let rules = Rules {
            width: board.width(),
            height: board.height(),
            ..rules
        };
        let spawner = Spawner::new(rules.spawn_rule, seed, rules.width);
        let mut game = Self::assemble(rules, board, current, next, spawner);
        game.check_spawn();
        game
    }

    fn assemble(rules: Rules, board: Board, current: Piece, next: Piece, spawner: Spawner) -> Self {
        let score = Score::new();
        Self {
            fall_interval: rules.progression.fall_interval(score.level),
            rules,
            board,
            current,
            next,
            spawner,
            score,
            state: GameState::Playing,
            since_fall: Duration::ZERO,
            lock_count: 0,
            color_override: None,
            events: Vec::new(),
        }
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::Rotate => self.rotate(),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::Reset => {
                self.reset();
                true
            }
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_place(self.current.shifted(-1, 0))
    }

    pub fn move_right(&mut self) -> bool {
        self.try_place(self.current.shifted(1, 0))
    }

    /// Turn clockwise in place. No kicks: a blocked rotation is rejected.
    pub fn rotate(&mut self) -> bool {
        self.try_place(self.current.rotated())
    }

    pub fn soft_drop(&mut self) -> bool {
        if self.try_place(self.current.shifted(0, 1)) {
            self.score.add_soft_drop(&self.rules.progression);
            true
        } else {
            false
        }
    }

    /// Drop to the lowest fitting row and lock immediately
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let mut distance = 0;
        while self.try_place(self.current.shifted(0, 1)) {
            distance += 1;
        }
        trace!(distance, "hard drop");
        self.lock_piece();
        self.since_fall = Duration::ZERO;
        true
    }

    /// Advance the fall timer. Applies at most one row of gravity per call,
    /// however far past the interval `elapsed` reaches.
    /// Returns true when a gravity step ran.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.since_fall = self.since_fall.saturating_add(elapsed);
        if self.since_fall < self.fall_interval {
            return false;
        }
        self.since_fall = Duration::ZERO;

        let below = self.current.shifted(0, 1);
        if self.board.is_valid(&below) {
            self.current = below;
            trace!(y = self.current.y, "gravity");
        } else {
            self.lock_piece();
        }
        true
    }

    /// `tick` for hosts that measure time in signed milliseconds.
    /// Negative values count as no time at all.
    pub fn tick_ms(&mut self, elapsed_ms: i64) -> bool {
        self.tick(Duration::from_millis(elapsed_ms.max(0) as u64))
    }

    /// Start over on an empty board. The spawner keeps its stream.
    pub fn reset(&mut self) {
        self.board = Board::new(self.rules.width, self.rules.height);
        self.score = Score::new();
        self.fall_interval = self.rules.progression.fall_interval(self.score.level);
        self.since_fall = Duration::ZERO;
        self.lock_count = 0;
        self.current = self.spawn();
        self.next = self.spawn();
        self.state = GameState::Playing;
        info!(
            current = %self.current.piece_type.letter(),
            next = %self.next.piece_type.letter(),
            "game reset"
        );
        self.check_spawn();
    }

    /// Recolor the current and next pieces and everything spawned later.
    /// `None` restores canonical colors.
    pub fn set_color_override(&mut self, color: Option<Color>) {
        self.color_override = color;
        self.current = self.paint(self.current);
        self.next = self.paint(self.next);
    }

    fn paint(&self, piece: Piece) -> Piece {
        piece.with_color(self.color_override.unwrap_or(piece.piece_type.color()))
    }

    fn spawn(&mut self) -> Piece {
        let piece = self.spawner.next();
        self.paint(piece)
    }

    fn try_place(&mut self, candidate: Piece) -> bool {
        if !self.is_playing() || !self.board.is_valid(&candidate) {
            return false;
        }
        self.current = candidate;
        true
    }

    /// Lock the current piece, clear rows, update progression and spawn next
    fn lock_piece(&mut self) {
        self.board.lock(&self.current);
        let cleared = self.board.clear_full_rows() as u32;
        let awarded = self.score.add_lock(cleared, &self.rules.progression);
        self.fall_interval = self.rules.progression.fall_interval(self.score.level);
        self.lock_count += 1;

        debug!(
            piece = %self.current.piece_type.letter(),
            cleared,
            awarded,
            score = self.score.points,
            level = self.score.level,
            "piece locked"
        );

        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        self.events.push(GameEvent::PieceLocked {
            lock_count: self.lock_count,
        });

        let upcoming = self.spawn();
        self.current = std::mem::replace(&mut self.next, upcoming);
        self.check_spawn();
    }

    /// Top out: the current piece does not fit where it was placed
    fn check_spawn(&mut self) {
        if !self.board.is_valid(&self.current) {
            self.enter_game_over();
        }
    }

    fn enter_game_over(&mut self) {
        self.state = GameState::GameOver;
        self.events.push(GameEvent::GameOver);
        info!(
            score = self.score.points,
            lines = self.score.lines,
            level = self.score.level,
            "game over"
        );
    }

    /// Row the current piece would lock at if hard dropped
    pub fn ghost_y(&self) -> i32 {
        let mut ghost = self.current;
        while self.board.is_valid(&ghost.shifted(0, 1)) {
            ghost = ghost.shifted(0, 1);
        }
        ghost.y
    }

    /// Take every event raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> u64 {
        self.score.points
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.score.lines
    }

    pub fn lock_count(&self) -> u64 {
        self.lock_count
    }

    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn color_override(&self) -> Option<Color> {
        self.color_override
    }

    /// Owned copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self
                .board
                .rows()
                .iter()
                .map(|row| row.iter().map(|cell| cell.color()).collect())
                .collect(),
            current: self.current,
            next: self.next,
            ghost_y: self.ghost_y(),
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            lock_count: self.lock_count,
            fall_interval_ms: self.fall_interval.as_millis() as u64,
            state: self.state,
        }
    }
}
