//! Game lifecycle tests driven through the public API only
//!
//! Positions are set up by restoring snapshots, the same path a loaded save
//! file takes.

use std::time::{Duration, Instant};

use blockfall::core::snapshot::{ActiveSnapshot, GameSnapshot, SNAPSHOT_VERSION};
use blockfall::core::{geometry, level_for_speed, Board, GameState};
use blockfall::types::{
    CoreEvent, GameAction, Phase, PieceKind, Rotation, BASE_SPEED, BOARD_ROWS, DROP_COOLDOWN_FRAMES,
    SOFT_DROP_SPEED, SPEED_INCREMENT,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// 22 board rows with `bottom` pressed against the floor
fn rows(bottom: &[&str]) -> Vec<String> {
    let mut out = vec![".".repeat(10); BOARD_ROWS as usize];
    let start = out.len() - bottom.len();
    for (i, row) in bottom.iter().enumerate() {
        out[start + i] = row.to_string();
    }
    out
}

fn active(kind: PieceKind, col: i8, row: i8, rotation: u8) -> ActiveSnapshot {
    ActiveSnapshot {
        kind,
        col,
        row,
        rotation,
    }
}

fn playing(board: Vec<String>, piece: ActiveSnapshot, next: PieceKind, now: Instant) -> GameState {
    let snapshot = GameSnapshot {
        version: SNAPSHOT_VERSION,
        phase: Phase::Playing,
        score: 0,
        level: 1,
        speed: BASE_SPEED,
        drop_cooldown: 0,
        active: Some(piece),
        next,
        board,
    };
    let mut game = GameState::new(11);
    game.restore(&snapshot, now).unwrap();
    game
}

/// Tick until the active piece lands, at most a board height of ticks
fn drop_to_floor(game: &mut GameState) {
    for _ in 0..=BOARD_ROWS {
        if game.tick() {
            return;
        }
    }
    panic!("piece never landed");
}

#[test]
fn tetris_scores_800() {
    let t0 = Instant::now();
    let filled = "JJJJJJJJJ.";
    // Vertical I in its East orientation fills mask column 2.
    let mut game = playing(
        rows(&[filled, filled, filled, filled]),
        active(PieceKind::I, 7, 18, 1),
        PieceKind::O,
        t0,
    );

    assert!(game.tick());
    assert_eq!(game.score(), 800);
    assert_eq!(game.board().filled_count(), 0);
    assert_eq!(
        game.drain_events().as_slice(),
        &[CoreEvent::PieceLanded {
            lines_cleared: 4,
            score_gained: 800
        }]
    );
}

#[test]
fn double_clear_scores_200_and_shifts_the_rest_down() {
    let t0 = Instant::now();
    let mut game = playing(
        rows(&["S.........", "ZZZZZZZZ..", "ZZZZZZZZ.."]),
        active(PieceKind::O, 8, 5, 0),
        PieceKind::T,
        t0,
    );

    drop_to_floor(&mut game);
    assert_eq!(game.score(), 200);
    assert_eq!(game.board().filled_count(), 1);
    assert_eq!(game.board().get(0, 21), Some(Some(PieceKind::S)));
}

#[test]
fn landing_without_clear_still_speeds_up() {
    let t0 = Instant::now();
    let mut game = playing(rows(&[]), active(PieceKind::O, 0, 0, 0), PieceKind::O, t0);

    for _ in 0..5 {
        drop_to_floor(&mut game);
        assert_eq!(game.drop_cooldown(), DROP_COOLDOWN_FRAMES);
    }

    let expected = BASE_SPEED + 5.0 * SPEED_INCREMENT;
    assert!((game.speed() - expected).abs() < 1e-4);
    assert_eq!(game.level(), level_for_speed(game.speed()));
    assert_eq!(game.score(), 0);
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn blocked_spawn_ends_the_round_without_touching_the_board() {
    let t0 = Instant::now();
    let mut board = rows(&["JJJJJJJJJ."; 20]);
    board[1] = "...JJJJ...".to_string();
    let mut game = playing(board, active(PieceKind::O, 0, 0, 0), PieceKind::T, t0);

    assert!(game.tick());

    let mut expected = Board::new();
    expected.add_piece(PieceKind::O, 0, 0, Rotation::North);
    for col in 3..7 {
        expected.set(col, 1, Some(PieceKind::J));
    }
    for row in 2..22 {
        for col in 0..9 {
            expected.set(col, row, Some(PieceKind::J));
        }
    }
    assert_eq!(game.board(), &expected);

    assert_eq!(game.phase(), Phase::GameOver);
    let piece = game.active().unwrap();
    assert_eq!(piece.kind, PieceKind::T);
    assert_eq!((piece.col, piece.row), (4, 0));
    assert!(game.clock().is_paused());
    assert_eq!(
        game.drain_events().as_slice(),
        &[
            CoreEvent::PieceLanded {
                lines_cleared: 0,
                score_gained: 0
            },
            CoreEvent::GameOver
        ]
    );

    // Nothing moves after the round ends.
    assert!(!game.tick());
    assert!(!game.apply_action(GameAction::MoveRight, t0));
    assert!(!game.apply_action(GameAction::Pause, t0));
    assert!(!game.frame(t0 + ms(10_000)));
    assert_eq!(game.board(), &expected);

    // A new game starts from scratch.
    assert!(game.apply_action(GameAction::NewGame, t0 + ms(20_000)));
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.board().filled_count(), 0);
    assert_eq!(game.score(), 0);
    assert_eq!(game.speed(), BASE_SPEED);
}

#[test]
fn four_turns_either_way_restore_every_piece() {
    let t0 = Instant::now();
    for kind in PieceKind::ALL {
        for clockwise in [true, false] {
            let mut game = playing(rows(&[]), active(kind, 3, 8, 0), PieceKind::O, t0);
            let start = game.active();
            for _ in 0..4 {
                assert!(game.rotate(clockwise), "{kind:?}");
            }
            assert_eq!(game.active(), start, "{kind:?} clockwise={clockwise}");
        }
    }
}

#[test]
fn rotation_against_either_wall_stays_on_the_board() {
    let t0 = Instant::now();
    let rotations = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];
    for kind in PieceKind::ALL {
        let dim = geometry::dimension(kind);
        for rotation in rotations {
            let left = -geometry::left_inset(kind, rotation);
            let right = 10 - dim + geometry::right_inset(kind, rotation);
            for col in [left, right] {
                let piece = active(kind, col, 8, rotation.index() as u8);
                let mut game = playing(rows(&[]), piece, PieceKind::O, t0);
                assert!(game.rotate(true), "{kind:?} {rotation:?} col {col}");
                let moved = game.active().unwrap();
                assert!(moved.is_valid(game.board()));
                assert!(moved.cells().iter().all(|&(c, _)| (0..10).contains(&c)));
            }
        }
    }
}

#[test]
fn blocked_rotation_and_move_leave_state_unchanged() {
    let t0 = Instant::now();
    // A vertical I in a one-wide well cannot lie down or step sideways.
    let well = "JJJJ.JJJJJ";
    let mut game = playing(
        rows(&[well, well, well, well, well]),
        active(PieceKind::I, 2, 17, 1),
        PieceKind::O,
        t0,
    );
    let before = game.snapshot();

    assert!(!game.rotate(true));
    assert!(!game.rotate(false));
    assert!(!game.move_horizontal(-1));
    assert!(!game.move_horizontal(1));
    assert_eq!(game.snapshot(), before);
}

#[test]
fn paused_game_ignores_time_and_piece_actions() {
    let t0 = Instant::now();
    let mut game = playing(rows(&[]), active(PieceKind::T, 4, 3, 0), PieceKind::O, t0);

    assert!(game.apply_action(GameAction::Pause, t0 + ms(100)));
    let before = game.snapshot();
    for action in [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::SoftDrop,
        GameAction::NewGame,
    ] {
        assert!(!game.apply_action(action, t0 + ms(200)), "{action:?}");
    }
    for i in 1..=50 {
        game.frame(t0 + ms(1000 * i));
    }
    assert_eq!(game.snapshot(), before);

    assert!(game.apply_action(GameAction::Pause, t0 + ms(60_000)));
    assert_eq!(game.phase(), Phase::Playing);
    assert!(game.frame(t0 + ms(61_000)));
    assert_eq!(game.active().unwrap().row, 4);
}

#[test]
fn soft_drop_falls_fast_until_released() {
    let t0 = Instant::now();
    let mut game = playing(rows(&[]), active(PieceKind::T, 4, 0, 0), PieceKind::O, t0);
    let period = (1000.0 / SOFT_DROP_SPEED) as u64;

    assert!(game.apply_action(GameAction::SoftDrop, t0));
    assert!(game.apply_action(GameAction::SoftDrop, t0));
    assert!(game.is_soft_dropping());
    for i in 1..=5 {
        assert!(game.frame(t0 + ms(period * i)));
    }
    assert_eq!(game.active().unwrap().row, 5);

    let released = t0 + ms(period * 5 + 1);
    assert!(game.apply_action(GameAction::SoftDropRelease, released));
    assert!(!game.apply_action(GameAction::SoftDropRelease, released));
    assert!(!game.frame(released + ms(500)));
    assert!(game.frame(released + ms(1000)));
    assert_eq!(game.active().unwrap().row, 6);
}

#[test]
fn landing_ends_soft_drop_and_blocks_it_during_cooldown() {
    let t0 = Instant::now();
    let mut game = playing(rows(&[]), active(PieceKind::O, 4, 20, 0), PieceKind::T, t0);

    assert!(game.begin_soft_drop(t0));
    assert!(game.frame(t0 + ms(40)));
    assert_eq!(game.active().unwrap().kind, PieceKind::T);
    assert!(!game.is_soft_dropping());
    assert!(!game.begin_soft_drop(t0 + ms(41)));

    // The cooldown counts down one per frame, ticks or not.
    let mut now = t0 + ms(40);
    for _ in 0..DROP_COOLDOWN_FRAMES {
        now += ms(1);
        game.frame(now);
    }
    assert_eq!(game.drop_cooldown(), 0);
    assert!(game.begin_soft_drop(now));
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let script = [
        GameAction::MoveLeft,
        GameAction::RotateCw,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::RotateCcw,
    ];

    let run = |seed: u32| {
        let t0 = Instant::now();
        let mut game = GameState::new(seed);
        game.start_new_game(t0);
        let mut now = t0;
        for frame in 0..4000u32 {
            now += ms(20);
            let action = script[frame as usize % script.len()];
            game.apply_action(action, now);
            game.frame(now);
            if game.phase() == Phase::GameOver {
                break;
            }
        }
        (game.snapshot(), game.next())
    };

    assert_eq!(run(2024), run(2024));
}

#[test]
fn new_game_is_ignored_mid_round() {
    let t0 = Instant::now();
    let mut game = GameState::new(5);
    assert_eq!(game.phase(), Phase::NotStarted);
    assert!(!game.apply_action(GameAction::MoveLeft, t0));
    assert!(game.apply_action(GameAction::NewGame, t0));

    let before = game.snapshot();
    assert!(!game.apply_action(GameAction::NewGame, t0 + ms(5)));
    assert_eq!(game.snapshot(), before);
}
