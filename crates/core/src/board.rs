//! Board module - manages the game grid
//!
//! The board is a 10x22 grid where each cell can be empty or filled with a piece kind.
//! Rows 0 and 1 are hidden headroom for spawning and rotation; rows 2..22 are visible.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (col, row) where col ranges 0..9 (left to right), row ranges 0..21 (top to bottom)

use crate::geometry;
use crate::types::{Cell, PieceKind, Rotation, BOARD_COLS, BOARD_ROWS, HIDDEN_ROWS};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = (BOARD_COLS as usize) * (BOARD_ROWS as usize);

const COLS: i8 = BOARD_COLS as i8;
const ROWS: i8 = BOARD_ROWS as i8;

/// The game board - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Create from a flat row-major array
    pub fn from_flat(cells: [Cell; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= COLS || row < 0 || row >= ROWS {
            return None;
        }
        Some((row as usize) * (BOARD_COLS as usize) + (col as usize))
    }

    pub fn cols(&self) -> u8 {
        BOARD_COLS
    }

    pub fn rows(&self) -> u8 {
        BOARD_ROWS
    }

    /// First row shown to the player
    pub fn first_visible_row(&self) -> u8 {
        HIDDEN_ROWS
    }

    /// Get cell at position (col, row)
    /// Returns None if out of bounds
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    /// Set cell at position (col, row)
    /// Returns false if out of bounds
    pub fn set(&mut self, col: i8, row: i8, cell: Cell) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, col: i8, row: i8) -> bool {
        matches!(self.get(col, row), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= BOARD_ROWS as usize {
            return false;
        }
        self.row(row).iter().all(|cell| cell.is_some())
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let width = BOARD_COLS as usize;
        let start = row * width;
        &self.cells[start..start + width]
    }

    /// Whether `kind` at `rotation` fits with its mask's top-left corner at (col, row)
    ///
    /// Bounds come from the rotation's insets (four range checks); only the
    /// occupied cells are then tested against the grid.
    pub fn is_valid_and_empty(&self, kind: PieceKind, col: i8, row: i8, rotation: Rotation) -> bool {
        if !Self::in_bounds(kind, col, row, rotation) {
            return false;
        }

        geometry::geometry(kind)
            .cells(rotation)
            .iter()
            .all(|&(dc, dr)| !self.is_occupied(col + dc, row + dr))
    }

    /// Whether every occupied cell of the placement lies inside the grid,
    /// ignoring what is already on the board
    pub fn in_bounds(kind: PieceKind, col: i8, row: i8, rotation: Rotation) -> bool {
        let geo = geometry::geometry(kind);
        let insets = geo.insets(rotation);
        let dim = geo.dimension();

        col >= -insets.left
            && col + dim - insets.right <= COLS
            && row >= -insets.top
            && row + dim - insets.bottom <= ROWS
    }

    /// Write every occupied mask cell into the grid
    ///
    /// No validation: existing cells are overwritten. Callers check
    /// [`Board::is_valid_and_empty`] first. Cells that fall outside the grid
    /// are dropped.
    pub fn add_piece(&mut self, kind: PieceKind, col: i8, row: i8, rotation: Rotation) {
        for (dc, dr) in geometry::cells(kind, rotation) {
            self.set(col + dc, row + dr, Some(kind));
        }
    }

    /// Clear a row and shift all rows above down
    /// Returns the number of lines cleared (1 or 0)
    pub fn clear_row(&mut self, row: usize) -> usize {
        if row >= BOARD_ROWS as usize {
            return 0;
        }

        let width = BOARD_COLS as usize;

        // Row r-1 copies into row r, from the cleared row up to row 1.
        for r in (1..=row).rev() {
            let src_start = (r - 1) * width;
            self.cells.copy_within(src_start..src_start + width, r * width);
        }

        self.cells[..width].fill(None);

        1
    }

    /// Clear every full row in a single top-to-bottom pass
    ///
    /// Each full row collapses the rows above it by one. Only rows above the
    /// scan index move, so the pass sees every original row exactly once.
    /// Returns the number of rows cleared.
    pub fn check_lines(&mut self) -> u32 {
        let mut cleared = 0;
        for row in 0..BOARD_ROWS as usize {
            if self.is_row_full(row) {
                cleared += self.clear_row(row) as u32;
            }
        }
        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Create from a 2D vector for testing (converts to flat array)
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        assert_eq!(cells_2d.len(), BOARD_ROWS as usize);
        assert!(cells_2d.iter().all(|row| row.len() == BOARD_COLS as usize));

        let mut flat = [None; BOARD_SIZE];
        for (r, row) in cells_2d.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                flat[r * BOARD_COLS as usize + c] = *cell;
            }
        }
        Self { cells: flat }
    }

    /// Convert to 2D vector for testing/display
    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        (0..BOARD_ROWS as usize).map(|r| self.row(r).to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
