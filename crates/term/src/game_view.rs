//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O) and never mutates the game. Only the visible
//! rows of the board are drawn; the hidden spawn rows stay off screen.

use crate::core::geometry;
use crate::core::GameState;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Phase, PieceKind, BOARD_COLS, BOARD_ROWS, HIDDEN_ROWS, VISIBLE_ROWS};

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

const HELP_LINES: [&str; 7] = [
    "A/D    move",
    "Q/E    rotate",
    "S      drop",
    "P      pause",
    "ENTER  new game",
    "G/C    save/load",
    "ESC    quit",
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Screen position of the playfield frame, computed once per render
#[derive(Debug, Clone, Copy)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render the current game state into a new framebuffer.
    pub fn render(&self, state: &GameState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(state, viewport, None, &mut fb);
        fb
    }

    /// Render into an existing framebuffer, with an optional status message
    /// under the playfield.
    pub fn render_into(
        &self,
        state: &GameState,
        viewport: Viewport,
        status: Option<&str>,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::new(' ', CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG)));

        let board_px_w = (BOARD_COLS as u16) * self.cell_w;
        let board_px_h = (VISIBLE_ROWS as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;
        let layout = Layout {
            start_x: viewport.width.saturating_sub(frame_w) / 2,
            start_y: viewport.height.saturating_sub(frame_h + 1) / 2,
            frame_w,
            frame_h,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAYFIELD_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        fb.fill_rect(
            layout.start_x + 1,
            layout.start_y + 1,
            board_px_w,
            board_px_h,
            ' ',
            bg,
        );
        draw_border(fb, layout, border);

        // Locked cells.
        let board = state.board();
        for row in HIDDEN_ROWS..BOARD_ROWS {
            for col in 0..BOARD_COLS {
                match board.get(col as i8, row as i8).flatten() {
                    Some(kind) => self.draw_board_cell(fb, layout, col as i8, row as i8, kind),
                    None => self.draw_empty_cell(fb, layout, col as i8, row as i8),
                }
            }
        }

        let show_piece = matches!(state.phase(), Phase::Playing | Phase::Paused);
        if let Some(active) = state.active().filter(|_| show_piece) {
            if let Some(ghost_row) = state.ghost_row() {
                let ghost = CellStyle::new(Rgb::new(140, 140, 140), PLAYFIELD_BG).dim();
                for (dc, dr) in geometry::cells(active.kind, active.rotation) {
                    self.fill_board_cell(fb, layout, active.col + dc, ghost_row + dr, '░', ghost);
                }
            }

            for (col, row) in active.cells() {
                self.draw_board_cell(fb, layout, col, row, active.kind);
            }
        }

        self.draw_side_panel(fb, state, viewport, layout);

        if let Some(text) = status {
            let y = layout.start_y.saturating_add(layout.frame_h);
            fb.put_str(
                layout.start_x,
                y,
                text,
                CellStyle::new(Rgb::new(230, 200, 120), SCREEN_BG),
            );
        }

        match state.phase() {
            Phase::NotStarted => draw_overlay_text(fb, layout, "PRESS ENTER"),
            Phase::Paused => draw_overlay_text(fb, layout, "PAUSED"),
            Phase::GameOver => draw_overlay_text(fb, layout, "GAME OVER"),
            Phase::Playing => {}
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, layout: Layout, col: i8, row: i8) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
        self.fill_board_cell(fb, layout, col, row, '·', style);
    }

    fn draw_board_cell(&self, fb: &mut FrameBuffer, layout: Layout, col: i8, row: i8, kind: PieceKind) {
        let style = CellStyle::new(piece_color(kind), PLAYFIELD_BG).bold();
        self.fill_board_cell(fb, layout, col, row, '█', style);
    }

    /// Fill one board cell; hidden rows and off-grid cells are skipped
    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        layout: Layout,
        col: i8,
        row: i8,
        ch: char,
        style: CellStyle,
    ) {
        if col < 0 || col >= BOARD_COLS as i8 || row < HIDDEN_ROWS as i8 || row >= BOARD_ROWS as i8 {
            return;
        }
        let px = layout.start_x + 1 + (col as u16) * self.cell_w;
        let py = layout.start_y + 1 + ((row as u16) - HIDDEN_ROWS as u16) * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, state: &GameState, viewport: Viewport, layout: Layout) {
        let panel_x = layout
            .start_x
            .saturating_add(layout.frame_w)
            .saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = layout.start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, state.score(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, state.level(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        self.draw_preview(fb, panel_x, y, state.next());
        y = y.saturating_add(3);

        let help = value.dim();
        for line in HELP_LINES {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y = y.saturating_add(1);
        }
    }

    /// Draw a piece's spawn orientation, trimmed to its occupied cells
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind) {
        let insets = geometry::insets(kind, crate::types::Rotation::North);
        let style = CellStyle::new(piece_color(kind), SCREEN_BG).bold();
        for (dc, dr) in geometry::cells(kind, crate::types::Rotation::North) {
            let px = x + ((dc - insets.left) as u16) * self.cell_w;
            let py = y + ((dr - insets.top) as u16) * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, '█', style);
        }
    }
}

/// Display color per piece kind
pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::Z => Rgb::new(220, 80, 80),
    }
}

fn draw_border(fb: &mut FrameBuffer, layout: Layout, style: CellStyle) {
    let Layout {
        start_x: x,
        start_y: y,
        frame_w: w,
        frame_h: h,
    } = layout;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, layout: Layout, text: &str) {
    let mid_y = layout.start_y.saturating_add(layout.frame_h / 2);
    let text_w = text.chars().count() as u16;
    let x = layout
        .start_x
        .saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
    fb.put_str(x, mid_y, text, style);
}
