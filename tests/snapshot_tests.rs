//! Save/restore tests over the JSON form of a snapshot

use std::time::{Duration, Instant};

use serde_json::{json, Value};

use blockfall::core::snapshot::{GameSnapshot, SnapshotError};
use blockfall::core::GameState;
use blockfall::types::{GameAction, Phase};

/// A game a few pieces in, paused
fn mid_game(seed: u32) -> (GameState, Instant) {
    let t0 = Instant::now();
    let mut game = GameState::new(seed);
    game.start_new_game(t0);

    let mut now = t0;
    for frame in 0..300u64 {
        now += Duration::from_millis(20);
        if frame % 7 == 0 {
            game.apply_action(GameAction::MoveLeft, now);
        }
        if frame % 11 == 0 {
            game.apply_action(GameAction::RotateCw, now);
        }
        game.apply_action(GameAction::SoftDrop, now);
        game.frame(now);
    }
    game.toggle_pause(now);
    (game, now)
}

fn to_json(game: &GameState) -> Value {
    serde_json::to_value(game.snapshot()).unwrap()
}

fn from_json(value: Value) -> GameSnapshot {
    serde_json::from_value(value).unwrap()
}

#[test]
fn json_round_trip_resumes_the_same_game() {
    let (game, now) = mid_game(77);
    assert_eq!(game.phase(), Phase::Paused);
    assert!(game.board().filled_count() > 0);

    let text = serde_json::to_string_pretty(&game.snapshot()).unwrap();
    let decoded: GameSnapshot = serde_json::from_str(&text).unwrap();

    let mut resumed = GameState::new(1);
    resumed.restore(&decoded, now).unwrap();
    assert_eq!(resumed.snapshot(), game.snapshot());
    assert_eq!(resumed.board(), game.board());
    assert_eq!(resumed.active(), game.active());
    assert!(resumed.clock().is_paused());
}

#[test]
fn json_layout_is_human_readable() {
    let (game, _) = mid_game(3);
    let value = to_json(&game);

    assert_eq!(value["phase"], json!("Paused"));
    assert_eq!(value["version"], json!(1));
    let rows = value["board"].as_array().unwrap();
    assert_eq!(rows.len(), 22);
    assert!(rows
        .iter()
        .all(|r| r.as_str().is_some_and(|s| s.chars().count() == 10)));
    assert!(value["next"].as_str().is_some_and(|s| s.len() == 1));
}

#[test]
fn missing_version_defaults_to_current() {
    let (game, now) = mid_game(5);
    let mut value = to_json(&game);
    value.as_object_mut().unwrap().remove("version");

    let mut other = GameState::new(1);
    other.restore(&from_json(value), now).unwrap();
    assert_eq!(other.snapshot(), game.snapshot());
}

/// Patch top-level fields of a good snapshot and try to restore it
fn rejection(target: &mut GameState, base: &Value, patch: Value, now: Instant) -> SnapshotError {
    let mut value = base.clone();
    if let Value::Object(fields) = patch {
        for (key, field) in fields {
            value[key.as_str()] = field;
        }
    }
    target.restore(&from_json(value), now).unwrap_err()
}

#[test]
fn defective_snapshots_are_rejected_without_side_effects() {
    let (source, now) = mid_game(21);
    let base = to_json(&source);

    let mut target = GameState::new(9);
    target.start_new_game(now);
    let before = target.snapshot();

    let err = rejection(&mut target, &base, json!({"version": 2}), now);
    assert_eq!(err, SnapshotError::UnsupportedVersion(2));

    let err = rejection(&mut target, &base, json!({"speed": 0.5}), now);
    assert!(matches!(err, SnapshotError::InvalidSpeed(_)), "{err}");

    let err = rejection(&mut target, &base, json!({"level": 0}), now);
    assert_eq!(err, SnapshotError::InvalidLevel(0));

    let err = rejection(&mut target, &base, json!({"board": vec![".........."; 21]}), now);
    assert!(matches!(err, SnapshotError::RowCount { found: 21, .. }), "{err}");

    let patch = json!({"active": {"kind": "T", "col": 4, "row": 5, "rotation": 4}});
    let err = rejection(&mut target, &base, patch, now);
    assert_eq!(err, SnapshotError::InvalidRotation(4));

    let patch = json!({"active": {"kind": "I", "col": 8, "row": 5, "rotation": 0}});
    let err = rejection(&mut target, &base, patch, now);
    assert_eq!(err, SnapshotError::ActiveOutOfBounds { col: 8, row: 5 });

    let mut stacked = vec![".........."; 22];
    stacked[10] = "ZZZZZZZZZ.";
    let patch = json!({
        "phase": "Playing",
        "board": stacked,
        "active": {"kind": "O", "col": 0, "row": 9, "rotation": 0}
    });
    let err = rejection(&mut target, &base, patch, now);
    assert_eq!(err, SnapshotError::ActiveOverlaps { col: 0, row: 9 });

    let patch = json!({"active": null, "phase": "Playing"});
    let err = rejection(&mut target, &base, patch, now);
    assert_eq!(err, SnapshotError::MissingActivePiece(Phase::Playing));

    assert_eq!(target.snapshot(), before);
    assert_eq!(target.phase(), Phase::Playing);
}

#[test]
fn unknown_board_symbol_names_its_position() {
    let (game, now) = mid_game(8);
    let mut snapshot = game.snapshot();
    snapshot.board[3] = "..X.......".to_string();

    let mut target = GameState::new(1);
    let err = target.restore(&snapshot, now).unwrap_err();
    assert_eq!(
        err,
        SnapshotError::UnknownCell {
            row: 3,
            col: 2,
            symbol: 'X'
        }
    );
    assert_eq!(target.phase(), Phase::NotStarted);
}

#[test]
fn unknown_piece_letter_fails_to_decode() {
    let (game, _) = mid_game(8);
    let mut value = to_json(&game);
    value["next"] = json!("Q");
    assert!(serde_json::from_value::<GameSnapshot>(value).is_err());
}

#[test]
fn not_started_snapshot_needs_no_active_piece() {
    let game = GameState::new(4);
    let snapshot = game.snapshot();
    assert_eq!(snapshot.active, None);

    let mut other = GameState::new(99);
    other.restore(&snapshot, Instant::now()).unwrap();
    assert_eq!(other.phase(), Phase::NotStarted);
    assert_eq!(other.next(), game.next());
    assert!(other.clock().is_paused());
}
