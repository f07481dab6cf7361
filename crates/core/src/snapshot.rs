//! Snapshot module - the persisted form of a game session
//!
//! A [`GameSnapshot`] carries every field needed to resume a game exactly:
//! phase, score, level, speed, drop cooldown, the active and next piece, and
//! the full 22-row grid. It is plain serde data; nothing in it is trusted
//! until [`GameSnapshot::validate`] has checked its structure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, BOARD_SIZE};
use crate::game_state::ActivePiece;
use crate::types::{Cell, Phase, PieceKind, Rotation, BASE_SPEED, BOARD_COLS, BOARD_ROWS};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Symbol for an empty cell in a board row
pub const EMPTY_SYMBOL: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub col: i8,
    pub row: i8,
    pub rotation: u8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            col: value.col,
            row: value.row,
            rotation: value.rotation.index() as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub phase: Phase,
    pub score: u32,
    pub level: u32,
    pub speed: f32,
    pub drop_cooldown: u32,
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    /// One string per row, top to bottom; `.` is empty, a piece letter is filled
    pub board: Vec<String>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// A snapshot whose structure has been checked and converted to core types
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSnapshot {
    pub phase: Phase,
    pub score: u32,
    pub level: u32,
    pub speed: f32,
    pub drop_cooldown: u32,
    pub active: Option<ActivePiece>,
    pub next: PieceKind,
    pub board: Board,
}

/// Structural defects that make a snapshot unusable
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    UnsupportedVersion(u32),
    RowCount { expected: usize, found: usize },
    RowWidth { row: usize, expected: usize, found: usize },
    UnknownCell { row: usize, col: usize, symbol: char },
    InvalidRotation(u8),
    InvalidSpeed(f32),
    InvalidLevel(u32),
    MissingActivePiece(Phase),
    ActiveOutOfBounds { col: i8, row: i8 },
    ActiveOverlaps { col: i8, row: i8 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::UnsupportedVersion(v) => write!(f, "unsupported snapshot version {v}"),
            SnapshotError::RowCount { expected, found } => {
                write!(f, "board has {found} rows, expected {expected}")
            }
            SnapshotError::RowWidth {
                row,
                expected,
                found,
            } => write!(f, "board row {row} has {found} cells, expected {expected}"),
            SnapshotError::UnknownCell { row, col, symbol } => {
                write!(f, "unknown cell symbol {symbol:?} at row {row}, col {col}")
            }
            SnapshotError::InvalidRotation(r) => write!(f, "rotation {r} is not in 0..=3"),
            SnapshotError::InvalidSpeed(s) => write!(f, "speed {s} is below {BASE_SPEED}"),
            SnapshotError::InvalidLevel(l) => write!(f, "level {l} is below 1"),
            SnapshotError::MissingActivePiece(phase) => {
                write!(f, "phase {phase:?} requires an active piece")
            }
            SnapshotError::ActiveOutOfBounds { col, row } => {
                write!(f, "active piece at ({col}, {row}) is outside the board")
            }
            SnapshotError::ActiveOverlaps { col, row } => {
                write!(f, "active piece at ({col}, {row}) overlaps locked cells")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl GameSnapshot {
    /// Check every structural invariant and convert to core types
    pub fn validate(&self) -> Result<ValidatedSnapshot, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        // NaN fails this comparison too.
        if !(self.speed >= BASE_SPEED) || !self.speed.is_finite() {
            return Err(SnapshotError::InvalidSpeed(self.speed));
        }
        if self.level < 1 {
            return Err(SnapshotError::InvalidLevel(self.level));
        }

        let board = decode_board(&self.board)?;

        let active = match self.active {
            Some(a) => {
                let rotation = Rotation::from_index(a.rotation as usize)
                    .ok_or(SnapshotError::InvalidRotation(a.rotation))?;
                if !Board::in_bounds(a.kind, a.col, a.row, rotation) {
                    return Err(SnapshotError::ActiveOutOfBounds {
                        col: a.col,
                        row: a.row,
                    });
                }
                // A blocked spawn leaves a GameOver piece on top of the stack.
                let live = matches!(self.phase, Phase::Playing | Phase::Paused);
                if live && !board.is_valid_and_empty(a.kind, a.col, a.row, rotation) {
                    return Err(SnapshotError::ActiveOverlaps {
                        col: a.col,
                        row: a.row,
                    });
                }
                Some(ActivePiece {
                    kind: a.kind,
                    col: a.col,
                    row: a.row,
                    rotation,
                })
            }
            None => None,
        };

        if active.is_none() && self.phase.has_active_piece() {
            return Err(SnapshotError::MissingActivePiece(self.phase));
        }

        Ok(ValidatedSnapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            speed: self.speed,
            drop_cooldown: self.drop_cooldown,
            active,
            next: self.next,
            board,
        })
    }
}

/// Render the grid as one symbol string per row
pub fn encode_board(board: &Board) -> Vec<String> {
    (0..BOARD_ROWS as usize)
        .map(|r| board.row(r).iter().map(|c| cell_symbol(*c)).collect())
        .collect()
}

/// Parse row strings back into a board, rejecting any shape mismatch
pub fn decode_board(rows: &[String]) -> Result<Board, SnapshotError> {
    let height = BOARD_ROWS as usize;
    let width = BOARD_COLS as usize;

    if rows.len() != height {
        return Err(SnapshotError::RowCount {
            expected: height,
            found: rows.len(),
        });
    }

    let mut cells: [Cell; BOARD_SIZE] = [None; BOARD_SIZE];
    for (r, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(SnapshotError::RowWidth {
                row: r,
                expected: width,
                found,
            });
        }
        for (c, symbol) in line.chars().enumerate() {
            cells[r * width + c] = match symbol {
                EMPTY_SYMBOL => None,
                other => Some(PieceKind::from_char(other).ok_or(SnapshotError::UnknownCell {
                    row: r,
                    col: c,
                    symbol: other,
                })?),
            };
        }
    }

    Ok(Board::from_flat(cells))
}

fn cell_symbol(cell: Cell) -> char {
    cell.map(|k| k.as_char()).unwrap_or(EMPTY_SYMBOL)
}
