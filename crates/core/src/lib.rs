//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules, state management and the cycle clock.
//! It has **no dependencies** on the terminal, key handling or the file system:
//!
//! - **Deterministic**: the same seed and the same input timeline produce the same game
//! - **Testable**: time is passed in as `Instant` values, never read behind the caller's back
//! - **Allocation-free hot path**: the board is a flat array and events use a fixed queue
//!
//! # Module Structure
//!
//! - [`geometry`]: shape masks, insets and spawn offsets for the seven pieces
//! - [`board`]: 10x22 grid with the placement predicate and line compaction
//! - [`clock`]: wall time to discrete logic cycles, with pause and rate changes
//! - [`game_state`]: active piece, next piece, score, level, speed and lifecycle
//! - [`rng`]: uniform random piece source
//! - [`snapshot`]: save-file model and structural validation
//!
//! # Game Rules
//!
//! | Rule | Value |
//! |------|-------|
//! | Line clear score | `50 << lines` (100, 200, 400, 800) |
//! | Speed after each landing | `+0.035` cycles per second |
//! | Level | `floor(speed * 1.70)` |
//! | Drop cooldown after landing | 25 frames |
//! | Game over | the next piece cannot spawn |
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use blockfall_core::GameState;
//! use blockfall_core::types::{GameAction, Phase};
//!
//! let t0 = Instant::now();
//! let mut game = GameState::new(12345);
//! assert!(game.apply_action(GameAction::NewGame, t0));
//! assert_eq!(game.phase(), Phase::Playing);
//!
//! let row = game.active().unwrap().row;
//! assert!(game.frame(t0 + Duration::from_secs(1)));
//! assert_eq!(game.active().unwrap().row, row + 1);
//! ```

pub mod board;
pub mod clock;
pub mod game_state;
pub mod geometry;
pub mod rng;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BOARD_SIZE};
pub use clock::Clock;
pub use game_state::{level_for_speed, line_clear_score, ActivePiece, GameState};
pub use geometry::{Insets, PieceGeometry};
pub use rng::SimpleRng;
pub use snapshot::{ActiveSnapshot, GameSnapshot, SnapshotError, ValidatedSnapshot};
