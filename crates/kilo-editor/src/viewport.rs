//! Viewport — which document rows are on screen.
//!
//! The viewport is the terminal size (queried once at startup) plus a
//! vertical `row_offset`: the document row shown on the first screen line.
//! [`scroll`](Viewport::scroll) keeps the cursor row visible by jumping the
//! offset the minimum distance needed. No smoothing.

use kilo_term::terminal::Size;

/// Vertical scroll state over a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible document row.
    pub row_offset: usize,
    /// Screen height in rows.
    pub rows: usize,
    /// Screen width in columns.
    pub cols: usize,
}

impl Viewport {
    /// Viewport at the top of the document for a terminal of `size`.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            row_offset: 0,
            rows: usize::from(size.rows),
            cols: usize::from(size.cols),
        }
    }

    /// Adjust `row_offset` so that `cursor_y` is on screen.
    ///
    /// Cursor above the window: the window's top moves to the cursor.
    /// Cursor below it: the window's bottom moves to the cursor.
    pub fn scroll(&mut self, cursor_y: usize) {
        if cursor_y < self.row_offset {
            self.row_offset = cursor_y;
        }
        if cursor_y >= self.row_offset + self.rows {
            self.row_offset = (cursor_y + 1).saturating_sub(self.rows);
        }
        debug_assert!(self.rows == 0 || self.is_visible(cursor_y));
    }

    /// Whether document row `y` is inside the window.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self, y: usize) -> bool {
        self.row_offset <= y && y < self.row_offset + self.rows
    }

    /// Screen row on which document row `y` is drawn.
    #[inline]
    #[must_use]
    pub const fn screen_row(&self, y: usize) -> usize {
        y.saturating_sub(self.row_offset)
    }
}
