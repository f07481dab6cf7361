//! Game state module - manages the complete game state
//!
//! This module ties together the board, piece geometry, the random piece
//! source and the cycle clock. It handles piece movement, rotation with wall
//! kicks, landing, line clears, speed progression and the game lifecycle.
//!
//! All time-dependent operations take the current [`Instant`] from the caller.

use std::time::Instant;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::board::Board;
use crate::clock::Clock;
use crate::geometry::{self, PieceCells};
use crate::rng::SimpleRng;
use crate::snapshot::{encode_board, GameSnapshot, SnapshotError, SNAPSHOT_VERSION};
use crate::types::*;

/// Capacity of the pending event queue between drains
pub const EVENT_CAPACITY: usize = 8;

const COLS: i8 = BOARD_COLS as i8;
const ROWS: i8 = BOARD_ROWS as i8;

/// Active falling piece
///
/// `col`/`row` locate the top-left corner of the piece's bounding mask in
/// board space. `row` may be negative while the piece is above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub col: i8,
    pub row: i8,
    pub rotation: Rotation,
}

impl ActivePiece {
    /// Create a piece at its kind's spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            col: geometry::spawn_column(kind),
            row: geometry::spawn_row(kind),
            rotation: Rotation::North,
        }
    }

    /// Occupied cells as absolute board coordinates
    pub fn cells(&self) -> PieceCells {
        let mut cells = geometry::cells(self.kind, self.rotation);
        for cell in cells.iter_mut() {
            cell.0 += self.col;
            cell.1 += self.row;
        }
        cells
    }

    /// Check if the piece fits on the board where it is
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_and_empty(self.kind, self.col, self.row, self.rotation)
    }

    fn shifted(self, dc: i8, dr: i8) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
            ..self
        }
    }
}

/// Shift a rotated placement back inside the grid by exactly its overflow
///
/// The insets of the target rotation tell how far the occupied cells reach;
/// a placement poking out on one side is moved just enough to touch that edge.
fn wall_kick(kind: PieceKind, col: i8, row: i8, rotation: Rotation) -> (i8, i8) {
    let insets = geometry::insets(kind, rotation);
    let dim = geometry::dimension(kind);

    let col = if col + insets.left < 0 {
        -insets.left
    } else if col + dim - insets.right > COLS {
        COLS - dim + insets.right
    } else {
        col
    };

    let row = if row + insets.top < 0 {
        -insets.top
    } else if row + dim - insets.bottom > ROWS {
        ROWS - dim + insets.bottom
    } else {
        row
    };

    (col, row)
}

/// Score for clearing `lines` rows at once
pub fn line_clear_score(lines: u32) -> u32 {
    match lines {
        0 => 0,
        n => LINE_SCORE_BASE << n.min(16),
    }
}

/// Displayed level for a cycle speed
pub fn level_for_speed(speed: f32) -> u32 {
    (speed * LEVEL_FACTOR) as u32
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    rng: SimpleRng,
    clock: Clock,
    phase: Phase,
    active: Option<ActivePiece>,
    next: PieceKind,
    score: u32,
    level: u32,
    speed: f32,
    drop_cooldown: u32,
    soft_dropping: bool,
    events: ArrayVec<CoreEvent, EVENT_CAPACITY>,
}

impl GameState {
    /// Create a game waiting for its first start, with the given RNG seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = rng.next_piece();
        let mut clock = Clock::new(BASE_SPEED, Instant::now());
        clock.set_paused(true);

        Self {
            board: Board::new(),
            rng,
            clock,
            phase: Phase::NotStarted,
            active: None,
            next,
            score: 0,
            level: INITIAL_LEVEL,
            speed: BASE_SPEED,
            drop_cooldown: 0,
            soft_dropping: false,
            events: ArrayVec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Baseline cycles per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn drop_cooldown(&self) -> u32 {
        self.drop_cooldown
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    /// Start a fresh round. Ignored while a round is in progress.
    pub fn start_new_game(&mut self, now: Instant) -> bool {
        if matches!(self.phase, Phase::Playing | Phase::Paused) {
            return false;
        }

        self.board.clear();
        self.score = 0;
        self.level = INITIAL_LEVEL;
        self.speed = BASE_SPEED;
        self.drop_cooldown = 0;
        self.soft_dropping = false;
        self.next = self.rng.next_piece();
        self.phase = Phase::Playing;
        self.clock.set_paused(false);
        self.set_speed_and_reset(BASE_SPEED, now);

        info!(first = self.next.as_str(), "new game");
        self.spawn_piece()
    }

    /// Promote the next piece to active and draw a new next piece
    ///
    /// A spawn position that is not valid-and-empty ends the round. The
    /// blocked piece stays as the active piece for display; the board is
    /// not touched. Outside `Playing` this does nothing and returns false.
    pub fn spawn_piece(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let kind = self.next;
        self.next = self.rng.next_piece();

        let piece = ActivePiece::spawn(kind);
        self.active = Some(piece);

        if !piece.is_valid(&self.board) {
            self.phase = Phase::GameOver;
            self.soft_dropping = false;
            self.clock.set_paused(true);
            self.push_event(CoreEvent::GameOver);
            info!(score = self.score, level = self.level, "game over");
            return false;
        }

        debug!(kind = kind.as_str(), next = self.next.as_str(), "spawned piece");
        true
    }

    /// Advance one logic cycle: fall one row, or land the piece
    ///
    /// Returns true if the piece landed.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let below = piece.shifted(0, 1);
        if below.is_valid(&self.board) {
            self.active = Some(below);
            return false;
        }

        self.land(piece);
        true
    }

    fn land(&mut self, piece: ActivePiece) {
        self.board
            .add_piece(piece.kind, piece.col, piece.row, piece.rotation);
        let lines_cleared = self.board.check_lines();
        let score_gained = line_clear_score(lines_cleared);
        self.score = self.score.saturating_add(score_gained);

        let speed = self.speed + SPEED_INCREMENT;
        self.level = level_for_speed(speed);
        self.drop_cooldown = DROP_COOLDOWN_FRAMES;
        self.soft_dropping = false;
        let now = self.clock.last_update();
        self.set_speed_and_reset(speed, now);

        self.push_event(CoreEvent::PieceLanded {
            lines_cleared,
            score_gained,
        });
        debug!(
            kind = piece.kind.as_str(),
            lines_cleared,
            score = self.score,
            speed = self.speed,
            "piece landed"
        );

        self.spawn_piece();
    }

    /// One frame of the outer loop
    ///
    /// Applies at most one tick, then counts the drop cooldown down.
    /// Returns whether a tick ran.
    pub fn frame(&mut self, now: Instant) -> bool {
        self.clock.update(now);
        let ticked = self.clock.has_elapsed_cycle();
        if ticked {
            self.tick();
        }
        if self.drop_cooldown > 0 {
            self.drop_cooldown -= 1;
        }
        ticked
    }

    /// Set the baseline speed and re-synchronize the clock to it
    pub fn set_speed_and_reset(&mut self, speed: f32, now: Instant) {
        self.speed = speed.max(BASE_SPEED);
        self.clock.set_cycles_per_second(self.speed);
        self.clock.reset(now);
    }

    /// Move the active piece one column; `direction` is -1 or 1
    pub fn move_horizontal(&mut self, direction: i8) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let moved = piece.shifted(direction.signum(), 0);
        if moved.is_valid(&self.board) {
            self.active = Some(moved);
            true
        } else {
            false
        }
    }

    /// Rotate the active piece a quarter turn, kicking it back inside the
    /// grid if the new orientation overflows an edge
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };

        let rotation = if clockwise {
            piece.rotation.rotate_cw()
        } else {
            piece.rotation.rotate_ccw()
        };
        let (col, row) = wall_kick(piece.kind, piece.col, piece.row, rotation);
        let rotated = ActivePiece {
            col,
            row,
            rotation,
            ..piece
        };

        if rotated.is_valid(&self.board) {
            self.active = Some(rotated);
            true
        } else {
            false
        }
    }

    /// Override the clock with the soft drop rate
    ///
    /// Ignored during the post-landing cooldown. Repeated calls are harmless.
    pub fn begin_soft_drop(&mut self, _now: Instant) -> bool {
        if self.phase != Phase::Playing || self.drop_cooldown > 0 {
            return false;
        }
        if !self.soft_dropping {
            self.soft_dropping = true;
            self.clock.set_cycles_per_second(SOFT_DROP_SPEED);
        }
        true
    }

    /// Restore the baseline speed after a soft drop
    pub fn end_soft_drop(&mut self, now: Instant) -> bool {
        if !self.soft_dropping {
            return false;
        }
        self.soft_dropping = false;
        self.set_speed_and_reset(self.speed, now);
        true
    }

    /// Switch between Playing and Paused; other phases are unaffected
    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Playing => {
                self.phase = Phase::Paused;
                self.clock.set_paused(true);
                info!("paused");
                true
            }
            Phase::Paused => {
                self.phase = Phase::Playing;
                self.soft_dropping = false;
                self.clock.set_paused(false);
                self.set_speed_and_reset(self.speed, now);
                info!("resumed");
                true
            }
            Phase::NotStarted | Phase::GameOver => false,
        }
    }

    /// Apply a game action. Returns true if it changed anything.
    pub fn apply_action(&mut self, action: GameAction, now: Instant) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            GameAction::RotateCw => self.rotate(true),
            GameAction::RotateCcw => self.rotate(false),
            GameAction::SoftDrop => self.begin_soft_drop(now),
            GameAction::SoftDropRelease => self.end_soft_drop(now),
            GameAction::Pause => self.toggle_pause(now),
            GameAction::NewGame => self.start_new_game(now),
        }
    }

    /// Row where the active piece would come to rest
    pub fn ghost_row(&self) -> Option<i8> {
        let piece = self.active?;
        if !piece.is_valid(&self.board) {
            return None;
        }
        let mut row = piece.row;
        while self
            .board
            .is_valid_and_empty(piece.kind, piece.col, row + 1, piece.rotation)
        {
            row += 1;
        }
        Some(row)
    }

    fn push_event(&mut self, event: CoreEvent) {
        // A full queue means nobody is listening; drop the event.
        let _ = self.events.try_push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> ArrayVec<CoreEvent, EVENT_CAPACITY> {
        std::mem::take(&mut self.events)
    }

    /// Capture everything needed to resume this game exactly
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            phase: self.phase,
            score: self.score,
            level: self.level,
            speed: self.speed,
            drop_cooldown: self.drop_cooldown,
            active: self.active.map(Into::into),
            next: self.next,
            board: encode_board(&self.board),
        }
    }

    /// Replace the live state with a snapshot
    ///
    /// The snapshot is validated in full first; on error nothing changes.
    /// The clock restarts from `now` so no stale cycles fire after loading.
    pub fn restore(&mut self, snapshot: &GameSnapshot, now: Instant) -> Result<(), SnapshotError> {
        let loaded = snapshot.validate()?;

        self.board = loaded.board;
        self.phase = loaded.phase;
        self.score = loaded.score;
        self.level = loaded.level;
        self.drop_cooldown = loaded.drop_cooldown;
        self.active = loaded.active;
        self.next = loaded.next;
        self.soft_dropping = false;
        self.events.clear();
        self.clock.set_paused(self.phase != Phase::Playing);
        self.set_speed_and_reset(loaded.speed, now);

        info!(
            phase = ?self.phase,
            score = self.score,
            level = self.level,
            "restored game"
        );
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
