use ratatui::layout::{Constraint, Layout, Rect};

use crate::settings::GridSize;
use crate::util::number_width;

pub const HORIZONTAL_MARGIN: u16 = 5;
pub const HEADER_HEIGHT: u16 = 4;
pub const FOOTER_HEIGHT: u16 = 2;

/// Splits the screen into header, body and footer
pub fn screen_chunks(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .areas(area)
}

/// Placement of the board's cells, centered in the body area.
/// Cells are boxed when they fit, single-line otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    area: Rect,
    origin_x: u16,
    origin_y: u16,
    cell_width: u16,
    cell_height: u16,
    size: u16,
    boxed: bool,
}

impl BoardLayout {
    pub fn compute(area: Rect, grid: GridSize) -> Self {
        let size = grid.get() as u16;
        let digits = number_width(grid.cell_count()) as u16;

        let (cell_width, cell_height, boxed) =
            if size * (digits + 4) <= area.width && size * 3 <= area.height {
                (digits + 4, 3, true)
            } else {
                (digits + 2, 1, false)
            };

        let origin_x = area.x + area.width.saturating_sub(size * cell_width) / 2;
        let origin_y = area.y + area.height.saturating_sub(size * cell_height) / 2;

        Self {
            area,
            origin_x,
            origin_y,
            cell_width,
            cell_height,
            size,
            boxed,
        }
    }

    pub fn is_boxed(&self) -> bool {
        self.boxed
    }

    /// Screen rectangle of the cell at row-major `index`, clipped to the body
    pub fn cell_rect(&self, index: usize) -> Rect {
        let size = self.size as usize;
        let row = (index / size) as u16;
        let col = (index % size) as u16;
        Rect::new(
            self.origin_x + col * self.cell_width,
            self.origin_y + row * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
        .intersection(self.area)
    }

    /// Row-major index of the cell under a screen position
    pub fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        if column < self.origin_x || row < self.origin_y {
            return None;
        }
        let col = (column - self.origin_x) / self.cell_width;
        let line = (row - self.origin_y) / self.cell_height;
        if col >= self.size || line >= self.size {
            return None;
        }
        let index = line as usize * self.size as usize + col as usize;
        let rect = self.cell_rect(index);
        if rect.is_empty() || !rect.contains((column, row).into()) {
            return None;
        }
        Some(index)
    }
}
