//! Editor — the viewer's state and its key dispatch.
//!
//! One `Editor` is built at startup and owns everything the loop mutates:
//! the [`Document`], the [`Viewport`], and the [`Cursor`]. It implements
//! kilo-term's [`App`] trait, so the event loop hands it keys and asks it
//! to paint.
//!
//! # Cursor bounds
//!
//! The cursor moves over the *screen*, not over text:
//!
//! - `x` is clamped to `[0, cols - 1]` regardless of the line's length.
//! - `y` is clamped to `[0, len]`, one past the last row. That extra row
//!   is where an append would go once editing exists.
//!
//! Neither bound looks at line content.

use kilo_term::event_loop::{Action, App};
use kilo_term::input::{Key, NamedKey};
use kilo_term::output::OutputBuffer;
use kilo_term::terminal::Size;

use crate::document::Document;
use crate::render;
use crate::viewport::Viewport;

/// Ctrl-Q.
pub const QUIT_KEY: Key = Key::ctrl(b'q');

/// Cursor position: `x` in screen columns, `y` in document rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

/// The viewer's entire mutable state.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    viewport: Viewport,
    cursor: Cursor,
}

impl Editor {
    /// Editor over `document` for a terminal of `size`, cursor at the origin.
    #[must_use]
    pub fn new(document: Document, size: Size) -> Self {
        Self {
            document,
            viewport: Viewport::new(size),
            cursor: Cursor::default(),
        }
    }

    /// The loaded document.
    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Current cursor position.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Current viewport.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// React to one key.
    ///
    /// Returns [`Action::Quit`] for Ctrl-Q. Keys with no binding are
    /// ignored; the viewer never changes the document.
    pub fn dispatch(&mut self, key: Key) -> Action {
        match key {
            QUIT_KEY => return Action::Quit,
            Key::Named(NamedKey::Home) => self.cursor.x = 0,
            Key::Named(NamedKey::End) => self.cursor.x = self.viewport.cols.saturating_sub(1),
            Key::Named(NamedKey::PageUp) => self.repeat_move(NamedKey::ArrowUp),
            Key::Named(NamedKey::PageDown) => self.repeat_move(NamedKey::ArrowDown),
            Key::Named(
                arrow @ (NamedKey::ArrowUp
                | NamedKey::ArrowDown
                | NamedKey::ArrowLeft
                | NamedKey::ArrowRight),
            ) => self.move_cursor(arrow),
            Key::Named(NamedKey::Delete) | Key::Char(_) | Key::Escape => {}
        }
        Action::Continue
    }

    /// Move one step in the arrow's direction, stopping at the bounds.
    fn move_cursor(&mut self, arrow: NamedKey) {
        let c = &mut self.cursor;
        match arrow {
            NamedKey::ArrowLeft => c.x = c.x.saturating_sub(1),
            NamedKey::ArrowRight => {
                if c.x + 1 < self.viewport.cols {
                    c.x += 1;
                }
            }
            NamedKey::ArrowUp => c.y = c.y.saturating_sub(1),
            NamedKey::ArrowDown => {
                if c.y < self.document.len() {
                    c.y += 1;
                }
            }
            _ => {}
        }
    }

    /// One screenful of single-row moves.
    fn repeat_move(&mut self, arrow: NamedKey) {
        for _ in 0..self.viewport.rows {
            self.move_cursor(arrow);
        }
    }

    /// Scroll to the cursor and render a frame into `out`.
    pub fn refresh(&mut self, out: &mut OutputBuffer) {
        self.viewport.scroll(self.cursor.y);
        render::draw_frame(out, &self.document, &self.viewport, self.cursor);
    }
}

impl App for Editor {
    fn on_key(&mut self, key: Key) -> Action {
        self.dispatch(key)
    }

    fn paint(&mut self, out: &mut OutputBuffer) {
        self.refresh(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor(rows: usize, cols: u16, screen_rows: u16) -> Editor {
        let doc: Document = (0..rows).map(|i| format!("line {i}")).collect();
        Editor::new(
            doc,
            Size {
                cols,
                rows: screen_rows,
            },
        )
    }

    fn press(e: &mut Editor, keys: &[Key]) {
        for &key in keys {
            assert_eq!(e.dispatch(key), Action::Continue);
        }
    }

    fn named(n: NamedKey) -> Key {
        Key::Named(n)
    }

    fn at(x: usize, y: usize) -> Cursor {
        Cursor { x, y }
    }

    // -- Quit ----------------------------------------------------------------

    #[test]
    fn ctrl_q_quits() {
        let mut e = editor(3, 40, 10);
        assert_eq!(e.dispatch(Key::Char(0x11)), Action::Quit);
    }

    #[test]
    fn plain_q_does_not_quit() {
        let mut e = editor(3, 40, 10);
        assert_eq!(e.dispatch(Key::Char(b'q')), Action::Continue);
    }

    // -- Horizontal ----------------------------------------------------------

    #[test]
    fn right_stops_at_last_column() {
        let mut e = editor(3, 40, 10);
        e.cursor.x = 39;
        press(&mut e, &[named(NamedKey::ArrowRight)]);
        assert_eq!(e.cursor().x, 39);
    }

    #[test]
    fn right_ignores_line_length() {
        let mut e = editor(1, 40, 10);
        press(&mut e, &[named(NamedKey::ArrowRight); 20]);
        assert_eq!(e.cursor().x, 20);
    }

    #[test]
    fn left_stops_at_zero() {
        let mut e = editor(3, 40, 10);
        press(&mut e, &[named(NamedKey::ArrowLeft)]);
        assert_eq!(e.cursor(), at(0, 0));
    }

    #[test]
    fn home_and_end() {
        let mut e = editor(3, 40, 10);
        press(&mut e, &[named(NamedKey::End)]);
        assert_eq!(e.cursor().x, 39);
        press(&mut e, &[named(NamedKey::Home)]);
        assert_eq!(e.cursor().x, 0);
    }

    // -- Vertical ------------------------------------------------------------

    #[test]
    fn up_stops_at_zero() {
        let mut e = editor(3, 40, 10);
        press(&mut e, &[named(NamedKey::ArrowUp)]);
        assert_eq!(e.cursor().y, 0);
    }

    #[test]
    fn down_stops_one_past_last_row() {
        let mut e = editor(3, 40, 10);
        press(&mut e, &[named(NamedKey::ArrowDown); 5]);
        assert_eq!(e.cursor().y, 3);
        press(&mut e, &[named(NamedKey::ArrowDown)]);
        assert_eq!(e.cursor().y, 3);
    }

    #[test]
    fn empty_document_pins_cursor_to_top() {
        let mut e = editor(0, 40, 10);
        press(&mut e, &[named(NamedKey::ArrowDown), named(NamedKey::PageDown)]);
        assert_eq!(e.cursor().y, 0);
    }

    #[test]
    fn page_down_moves_a_screenful() {
        let mut e = editor(100, 40, 10);
        press(&mut e, &[named(NamedKey::PageDown)]);
        assert_eq!(e.cursor().y, 10);
        press(&mut e, &[named(NamedKey::PageDown); 20]);
        assert_eq!(e.cursor().y, 100);
    }

    #[test]
    fn page_up_moves_a_screenful() {
        let mut e = editor(100, 40, 10);
        e.cursor.y = 25;
        press(&mut e, &[named(NamedKey::PageUp)]);
        assert_eq!(e.cursor().y, 15);
        press(&mut e, &[named(NamedKey::PageUp); 3]);
        assert_eq!(e.cursor().y, 0);
    }

    // -- Ignored keys --------------------------------------------------------

    #[test]
    fn unbound_keys_change_nothing() {
        let mut e = editor(5, 40, 10);
        e.cursor = at(3, 2);
        press(
            &mut e,
            &[Key::Char(b'x'), Key::Escape, named(NamedKey::Delete), Key::Char(b'\r')],
        );
        assert_eq!(e.cursor(), at(3, 2));
        assert_eq!(e.document().len(), 5);
    }

    // -- Refresh -------------------------------------------------------------

    #[test]
    fn refresh_scrolls_to_cursor() {
        let mut e = editor(100, 40, 10);
        press(&mut e, &[named(NamedKey::ArrowDown); 15]);
        let mut out = OutputBuffer::new();
        e.refresh(&mut out);
        assert_eq!(e.viewport().row_offset, 6);

        let text = String::from_utf8_lossy(out.as_bytes()).into_owned();
        assert!(text.contains("line 6\x1b[K"));
        assert!(!text.contains("line 5\x1b[K"));
        assert!(text.ends_with("\x1b[10;1H\x1b[?25h"));
    }

    #[test]
    fn refresh_on_virtual_last_row() {
        let mut e = editor(3, 40, 2);
        press(&mut e, &[named(NamedKey::ArrowDown); 3]);
        let mut out = OutputBuffer::new();
        e.refresh(&mut out);
        assert_eq!(e.viewport().row_offset, 2);
        let text = String::from_utf8_lossy(out.as_bytes()).into_owned();
        assert!(text.contains("line 2\x1b[K\r\n~\x1b[K"));
    }
}
