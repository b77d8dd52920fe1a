//! End-to-end rule scenarios through the public API

use std::time::Duration;
use tetrs_rules::{
    Action, Board, Cell, Color, Game, GameEvent, GameState, Piece, Rules, TetrominoType,
};

fn empty_board() -> Board {
    let rules = Rules::default();
    Board::new(rules.width, rules.height)
}

fn game_on(board: Board, current: Piece, next: Piece) -> Game {
    Game::from_parts(Rules::default(), board, current, next, 1234)
}

#[test]
fn test_o_piece_hard_drop_on_empty_board() {
    let current = Piece::new(TetrominoType::O, 4, 0);
    let next = Piece::spawn(TetrominoType::T, 10);
    let mut game = game_on(empty_board(), current, next);

    assert!(game.hard_drop());

    let board = game.board();
    for row in 18..20 {
        for col in 4..6 {
            assert_eq!(board.get(row, col), Some(Cell::Filled(Color::YELLOW)));
        }
    }
    assert_eq!(board.filled_count(), 4);
    assert_eq!(game.lines_cleared(), 0);
    assert_eq!(game.score(), 0);
    assert!(game.is_playing());
}

#[test]
fn test_filling_the_gap_clears_one_row() {
    let mut board = empty_board();
    // Bottom row full except column 9; one marker block above it
    for col in 0..9 {
        board.set(19, col, Cell::Filled(Color::BLUE));
    }
    board.set(18, 0, Cell::Filled(Color::RED));

    // Vertical I dropped into column 9
    let mut current = Piece::new(TetrominoType::I, 9, 0);
    current.rotation = current.rotation.cw();
    let mut game = game_on(board, current, Piece::spawn(TetrominoType::O, 10));

    game.process_action(Action::HardDrop);

    assert_eq!(game.lines_cleared(), 1);
    assert_eq!(game.level(), 1);
    assert_eq!(game.score(), 100);
    // The marker shifted down into the cleared row
    assert_eq!(game.board().get(19, 0), Some(Cell::Filled(Color::RED)));
    // Three I cells remain in column 9 above it
    for row in 17..20 {
        assert_eq!(game.board().get(row, 9), Some(Cell::Filled(Color::CYAN)));
    }
    assert_eq!(game.board().get(16, 9), Some(Cell::Empty));
    assert_eq!(game.board().filled_count(), 4);
    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::LinesCleared(1),
            GameEvent::PieceLocked { lock_count: 1 }
        ]
    );
}

#[test]
fn test_double_clear_pays_once_and_levels_up() {
    let mut rules = Rules::default();
    rules.progression.lines_per_level = 1;

    let mut board = Board::new(rules.width, rules.height);
    for row in 18..20 {
        for col in 0..9 {
            board.set(row, col, Cell::Filled(Color::BLUE));
        }
    }
    let mut current = Piece::new(TetrominoType::I, 9, 0);
    current.rotation = current.rotation.cw();
    let mut game = Game::from_parts(rules, board, current, Piece::spawn(TetrominoType::O, 10), 5);
    assert_eq!(game.fall_interval(), Duration::from_millis(500));

    game.hard_drop();

    assert_eq!(game.lines_cleared(), 2);
    // One flat bonus at the level the lock happened on
    assert_eq!(game.score(), 100);
    assert_eq!(game.level(), 3);
    assert_eq!(game.fall_interval(), Duration::from_millis(420));
    // The top half of the I sank into the cleared rows
    assert_eq!(game.board().get(19, 9), Some(Cell::Filled(Color::CYAN)));
    assert_eq!(game.board().get(18, 9), Some(Cell::Filled(Color::CYAN)));
    assert_eq!(game.board().filled_count(), 2);
}

#[test]
fn test_topped_out_board_ends_game() {
    let mut board = empty_board();
    // Occupy the spawn region at rows 0-1, leaving a column free so nothing clears
    for row in 0..2 {
        for col in 3..7 {
            board.set(row, col, Cell::Filled(Color::RED));
        }
    }
    // Current piece sits away from the blocked spawn area
    let current = Piece::new(TetrominoType::O, 0, 0);
    let next = Piece::spawn(TetrominoType::T, 10);
    let mut game = game_on(board, current, next);
    assert!(game.is_playing());

    game.hard_drop();
    assert_eq!(game.state(), GameState::GameOver);
    assert_eq!(game.drain_events().last(), Some(&GameEvent::GameOver));

    let frozen = game.board().clone();
    let piece = *game.current_piece();
    assert!(!game.move_left());
    assert!(!game.move_right());
    assert!(!game.rotate());
    assert!(!game.soft_drop());
    assert!(!game.hard_drop());
    assert!(!game.tick(Duration::from_secs(5)));
    assert_eq!(game.board(), &frozen);
    assert_eq!(game.current_piece(), &piece);
    assert!(game.drain_events().is_empty());

    game.reset();
    assert!(game.is_playing());
    assert!(game.board().is_empty());
}

#[test]
fn test_gravity_stack_until_game_over() {
    let mut game = Game::with_seed(Rules::default(), 31337);
    let mut locks = 0;
    let mut over = 0;
    // Nothing but gravity: pieces stack in the middle until the spawn is blocked
    for _ in 0..10_000 {
        game.tick(Duration::from_millis(500));
        for event in game.drain_events() {
            match event {
                GameEvent::PieceLocked { lock_count } => {
                    locks += 1;
                    assert_eq!(lock_count, locks);
                }
                GameEvent::GameOver => over += 1,
                GameEvent::LinesCleared(_) => {}
            }
        }
        if game.is_game_over() {
            break;
        }
    }
    assert!(game.is_game_over());
    assert_eq!(over, 1);
    assert!(locks > 1);
    assert_eq!(game.lines_cleared(), 0);
}

#[test]
fn test_fall_interval_never_increases() {
    let rules = Rules::default();
    let mut previous = rules.progression.fall_interval(1);
    for level in 1..500 {
        let interval = rules.progression.fall_interval(level);
        assert!(interval <= previous);
        assert!(interval >= Duration::from_millis(rules.progression.min_interval_ms));
        previous = interval;
    }
}

#[test]
fn test_snapshot_serializes_for_collaborators() {
    let mut game = Game::with_seed(Rules::default(), 2);
    game.hard_drop();
    let json = serde_json::to_value(game.snapshot()).unwrap();
    assert_eq!(json["lock_count"], 1);
    assert_eq!(json["state"], "Playing");
    assert_eq!(json["board"].as_array().unwrap().len(), 20);
}
