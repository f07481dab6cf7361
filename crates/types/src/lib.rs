//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the game.
//! Everything here is plain data, usable from the core simulation, the
//! terminal renderer, the input layer and the save-file store alike.
//!
//! # Board Dimensions
//!
//! The playfield is fixed:
//!
//! - **Columns**: 10 (indexed 0-9, left to right)
//! - **Rows**: 22 (indexed 0-21, top to bottom)
//! - Rows 0-1 are hidden spawn/rotation headroom, rows 2-21 are visible
//!
//! # Timing and Difficulty
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 20 | Frame cadence of the outer loop (50 frames/s) |
//! | `BASE_SPEED` | 1.0 | Logic cycles per second at the start of a game |
//! | `SPEED_INCREMENT` | 0.035 | Speed added every time a piece lands |
//! | `LEVEL_FACTOR` | 1.70 | `level = floor(speed * LEVEL_FACTOR)` |
//! | `SOFT_DROP_SPEED` | 25.0 | Temporary cycle rate while soft drop is held |
//! | `DROP_COOLDOWN_FRAMES` | 25 | Frames after a landing during which soft drop is ignored |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, Rotation, GameAction, BOARD_COLS, BOARD_ROWS};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//! assert_eq!(PieceKind::from_char('T'), Some(piece));
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_index(3), Some(Rotation::West));
//!
//! assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
//!
//! assert_eq!(BOARD_COLS, 10);
//! assert_eq!(BOARD_ROWS, 22);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_COLS: u8 = 10;

/// Rows visible to the player
pub const VISIBLE_ROWS: u8 = 20;

/// Rows above the visible area used for spawning and rotation headroom
pub const HIDDEN_ROWS: u8 = 2;

/// Total board height in cells (22 rows)
pub const BOARD_ROWS: u8 = VISIBLE_ROWS + HIDDEN_ROWS;

/// Frame interval of the outer loop in milliseconds (50 frames/s)
pub const FRAME_MS: u32 = 20;

/// Logic cycles per second at the start of a game
pub const BASE_SPEED: f32 = 1.0;

/// Cycles per second added every time a piece lands
pub const SPEED_INCREMENT: f32 = 0.035;

/// Displayed level is `floor(speed * LEVEL_FACTOR)`
pub const LEVEL_FACTOR: f32 = 1.70;

/// Level shown when a game starts
pub const INITIAL_LEVEL: u32 = 1;

/// Cycle rate while the soft drop input is held
pub const SOFT_DROP_SPEED: f32 = 25.0;

/// Frames after a landing during which soft drop input is ignored
pub const DROP_COOLDOWN_FRAMES: u32 = 25;

/// Line clear score is `LINE_SCORE_BASE << lines` (100/200/400/800)
pub const LINE_SCORE_BASE: u32 = 50;

/// The seven piece kinds
///
/// Declaration order is the order used for uniform random selection and for
/// the geometry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind, in table order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Number of piece kinds
    pub const COUNT: usize = 7;

    /// Position of this kind in [`PieceKind::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }

    /// Uppercase letter used for board rows in save files
    pub fn as_char(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Inverse of [`PieceKind::as_char`]; only uppercase letters are accepted
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Rotation states, numbered 0..=3 clockwise from the spawn orientation
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation index 0..=3
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Rotation::North),
            1 => Some(Rotation::East),
            2 => Some(Rotation::South),
            3 => Some(Rotation::West),
            _ => None,
        }
    }
}

/// Lifecycle phase of a game session
///
/// `NotStarted -> Playing -> {Paused <-> Playing} -> GameOver -> (restart) -> Playing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

impl Phase {
    /// Whether a falling piece is part of the state in this phase
    pub fn has_active_piece(&self) -> bool {
        matches!(self, Phase::Playing | Phase::Paused | Phase::GameOver)
    }
}

/// Game actions produced by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Soft drop pressed: temporarily raise the cycle rate
    SoftDrop,
    /// Soft drop released: restore the baseline cycle rate
    SoftDropRelease,
    /// Toggle pause state
    Pause,
    /// Start a game from the title or game-over screen
    NewGame,
}

impl GameAction {
    /// Parse action from its camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "softdrop" => Some(GameAction::SoftDrop),
            "softdroprelease" => Some(GameAction::SoftDropRelease),
            "pause" => Some(GameAction::Pause),
            "newgame" => Some(GameAction::NewGame),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::SoftDrop => "softDrop",
            GameAction::SoftDropRelease => "softDropRelease",
            GameAction::Pause => "pause",
            GameAction::NewGame => "newGame",
        }
    }
}

/// Notification emitted by the core for fire-and-forget collaborators (audio).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent {
    /// A piece was committed to the board.
    PieceLanded {
        lines_cleared: u32,
        score_gained: u32,
    },
    /// A freshly spawned piece collided; the round is over.
    GameOver,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;
