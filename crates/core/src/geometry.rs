//! Piece geometry - shape masks, insets and spawn offsets for the seven pieces
//!
//! Every piece kind owns a square bounding mask (2x2, 3x3 or 4x4) with one
//! row-major boolean mask per rotation state. Insets and spawn offsets are
//! derived from the masks at compile time, so the authored data is only the
//! masks themselves.

use crate::types::{PieceKind, Rotation};

/// Largest bounding box side (the I piece)
pub const MAX_DIMENSION: usize = 4;

const MASK_LEN: usize = MAX_DIMENSION * MAX_DIMENSION;

/// Occupied cells per piece, in every rotation
pub const CELLS_PER_PIECE: usize = 4;

/// Row-major occupancy; only the first `dimension * dimension` entries are used.
type Mask = [bool; MASK_LEN];

/// Offset of a single occupied cell as (col, row) from the mask's top-left corner
pub type CellOffset = (i8, i8);

/// The four occupied cells of a piece at one rotation
pub type PieceCells = [CellOffset; CELLS_PER_PIECE];

/// Empty border rows/columns between the bounding box edge and the first
/// occupied cell, per side. `-1` marks an entirely empty mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insets {
    pub left: i8,
    pub right: i8,
    pub top: i8,
    pub bottom: i8,
}

impl Insets {
    const EMPTY: Insets = Insets {
        left: -1,
        right: -1,
        top: -1,
        bottom: -1,
    };
}

/// Static record for one piece kind
#[derive(Debug)]
pub struct PieceGeometry {
    dimension: i8,
    masks: [Mask; 4],
    insets: [Insets; 4],
    cells: [PieceCells; 4],
    spawn_col: i8,
    spawn_row: i8,
}

impl PieceGeometry {
    pub fn dimension(&self) -> i8 {
        self.dimension
    }

    pub fn insets(&self, rotation: Rotation) -> Insets {
        self.insets[rotation.index()]
    }

    pub fn cells(&self, rotation: Rotation) -> &PieceCells {
        &self.cells[rotation.index()]
    }

    pub fn is_tile(&self, col: i8, row: i8, rotation: Rotation) -> bool {
        if col < 0 || row < 0 || col >= self.dimension || row >= self.dimension {
            return false;
        }
        let d = self.dimension as usize;
        self.masks[rotation.index()][row as usize * d + col as usize]
    }

    pub fn spawn_column(&self) -> i8 {
        self.spawn_col
    }

    pub fn spawn_row(&self) -> i8 {
        self.spawn_row
    }
}

const I_MASKS: [&str; 4] = [
    concat!("....", "XXXX", "....", "...."),
    concat!("..X.", "..X.", "..X.", "..X."),
    concat!("....", "....", "XXXX", "...."),
    concat!(".X..", ".X..", ".X..", ".X.."),
];

const J_MASKS: [&str; 4] = [
    concat!("X..", "XXX", "..."),
    concat!(".XX", ".X.", ".X."),
    concat!("...", "XXX", "..X"),
    concat!(".X.", ".X.", "XX."),
];

const L_MASKS: [&str; 4] = [
    concat!("..X", "XXX", "..."),
    concat!(".X.", ".X.", ".XX"),
    concat!("...", "XXX", "X.."),
    concat!("XX.", ".X.", ".X."),
];

const O_MASKS: [&str; 4] = [
    concat!("XX", "XX"),
    concat!("XX", "XX"),
    concat!("XX", "XX"),
    concat!("XX", "XX"),
];

const S_MASKS: [&str; 4] = [
    concat!(".XX", "XX.", "..."),
    concat!(".X.", ".XX", "..X"),
    concat!("...", ".XX", "XX."),
    concat!("X..", "XX.", ".X."),
];

const T_MASKS: [&str; 4] = [
    concat!(".X.", "XXX", "..."),
    concat!(".X.", ".XX", ".X."),
    concat!("...", "XXX", ".X."),
    concat!(".X.", "XX.", ".X."),
];

const Z_MASKS: [&str; 4] = [
    concat!("XX.", ".XX", "..."),
    concat!("..X", ".XX", ".X."),
    concat!("...", "XX.", ".XX"),
    concat!(".X.", "XX.", "X.."),
];

/// Indexed by [`PieceKind::index`].
static GEOMETRY: [PieceGeometry; PieceKind::COUNT] = [
    build(4, I_MASKS),
    build(3, J_MASKS),
    build(3, L_MASKS),
    build(2, O_MASKS),
    build(3, S_MASKS),
    build(3, T_MASKS),
    build(3, Z_MASKS),
];

const fn build(dimension: usize, sources: [&str; 4]) -> PieceGeometry {
    let mut masks = [[false; MASK_LEN]; 4];
    let mut insets = [Insets::EMPTY; 4];
    let mut cells = [[(0, 0); CELLS_PER_PIECE]; 4];

    let mut r = 0;
    while r < 4 {
        masks[r] = parse_mask(sources[r], dimension);
        insets[r] = compute_insets(&masks[r], dimension);
        cells[r] = collect_cells(&masks[r], dimension);
        r += 1;
    }

    PieceGeometry {
        dimension: dimension as i8,
        masks,
        insets,
        cells,
        spawn_col: 5 - (dimension as i8) / 2,
        spawn_row: insets[0].top,
    }
}

const fn parse_mask(src: &str, dimension: usize) -> Mask {
    let bytes = src.as_bytes();
    assert!(bytes.len() == dimension * dimension, "mask size must match dimension");

    let mut mask = [false; MASK_LEN];
    let mut i = 0;
    while i < bytes.len() {
        mask[i] = bytes[i] == b'X';
        i += 1;
    }
    mask
}

const fn compute_insets(mask: &Mask, dimension: usize) -> Insets {
    let mut insets = Insets::EMPTY;
    let d = dimension;

    let mut i = 0;
    while i < d {
        let mut j = 0;
        while j < d {
            // Column i from the left / right, row i from the top / bottom.
            if insets.left < 0 && mask[j * d + i] {
                insets.left = i as i8;
            }
            if insets.right < 0 && mask[j * d + (d - 1 - i)] {
                insets.right = i as i8;
            }
            if insets.top < 0 && mask[i * d + j] {
                insets.top = i as i8;
            }
            if insets.bottom < 0 && mask[(d - 1 - i) * d + j] {
                insets.bottom = i as i8;
            }
            j += 1;
        }
        i += 1;
    }
    insets
}

const fn collect_cells(mask: &Mask, dimension: usize) -> PieceCells {
    let mut cells = [(0, 0); CELLS_PER_PIECE];
    let mut n = 0;
    let mut i = 0;
    while i < dimension * dimension {
        if mask[i] {
            assert!(n < CELLS_PER_PIECE, "mask has more than four cells");
            cells[n] = ((i % dimension) as i8, (i / dimension) as i8);
            n += 1;
        }
        i += 1;
    }
    assert!(n == CELLS_PER_PIECE, "mask has fewer than four cells");
    cells
}

/// Geometry record for a piece kind
pub fn geometry(kind: PieceKind) -> &'static PieceGeometry {
    &GEOMETRY[kind.index()]
}

/// Side length of the bounding mask
pub fn dimension(kind: PieceKind) -> i8 {
    geometry(kind).dimension
}

/// Whether the mask for `kind` at `rotation` has an occupied cell at (col, row)
///
/// Coordinates are mask-local and expected inside `[0, dimension)`; anything
/// outside reads as empty.
pub fn is_tile(kind: PieceKind, col: i8, row: i8, rotation: Rotation) -> bool {
    geometry(kind).is_tile(col, row, rotation)
}

pub fn insets(kind: PieceKind, rotation: Rotation) -> Insets {
    geometry(kind).insets(rotation)
}

pub fn left_inset(kind: PieceKind, rotation: Rotation) -> i8 {
    insets(kind, rotation).left
}

pub fn right_inset(kind: PieceKind, rotation: Rotation) -> i8 {
    insets(kind, rotation).right
}

pub fn top_inset(kind: PieceKind, rotation: Rotation) -> i8 {
    insets(kind, rotation).top
}

pub fn bottom_inset(kind: PieceKind, rotation: Rotation) -> i8 {
    insets(kind, rotation).bottom
}

/// Spawn column, `5 - dimension / 2`
pub fn spawn_column(kind: PieceKind) -> i8 {
    geometry(kind).spawn_col
}

/// Spawn row, the top inset of rotation 0
pub fn spawn_row(kind: PieceKind) -> i8 {
    geometry(kind).spawn_row
}

/// Occupied cells as (col, row) offsets, in row-major mask order
pub fn cells(kind: PieceKind, rotation: Rotation) -> PieceCells {
    *geometry(kind).cells(rotation)
}
