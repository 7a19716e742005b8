//! Renderer — one frame, built in memory.
//!
//! [`draw_frame`] writes a complete screen into an [`OutputBuffer`]:
//!
//! ```text
//! ESC[?25l  ESC[H                       hide cursor, home
//! row 0 ........................ ESC[K \r\n
//! row 1 ........................ ESC[K \r\n
//! ...
//! row N-1 ...................... ESC[K        no trailing \r\n
//! ESC[<y>;<x>H  ESC[?25h                place cursor, show it
//! ```
//!
//! Rows past the end of the document show `~`. An empty document gets a
//! centered welcome banner a third of the way down. Document lines are
//! truncated at the screen width, never wrapped, and counted in bytes.
//!
//! Nothing here touches the terminal. The caller flushes the buffer in one
//! write, so the terminal never shows a half-drawn frame.

use kilo_term::ansi;
use kilo_term::output::OutputBuffer;

use crate::document::Document;
use crate::editor::Cursor;
use crate::viewport::Viewport;

/// Version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The welcome banner text, untruncated.
#[must_use]
pub fn welcome_message() -> String {
    format!("kilo editor -- version {VERSION}")
}

/// Render a full frame for `document` as seen through `viewport`.
///
/// `viewport` should already be scrolled so that `cursor.y` is visible.
pub fn draw_frame(out: &mut OutputBuffer, document: &Document, viewport: &Viewport, cursor: Cursor) {
    // OutputBuffer writes can't fail.
    let _ = ansi::cursor_hide(out);
    let _ = ansi::cursor_home(out);

    draw_rows(out, document, viewport);

    let _ = ansi::cursor_to(out, cursor.x, viewport.screen_row(cursor.y));
    let _ = ansi::cursor_show(out);
}

/// Draw every screen row, separated by `\r\n`.
pub fn draw_rows(out: &mut OutputBuffer, document: &Document, viewport: &Viewport) {
    let banner_row = viewport.rows / 3;

    for y in 0..viewport.rows {
        let file_row = y + viewport.row_offset;

        match document.line(file_row) {
            Some(line) => {
                let len = line.len().min(viewport.cols);
                out.push_bytes(&line.as_bytes()[..len]);
            }
            None if document.is_empty() && y == banner_row => {
                draw_welcome(out, viewport.cols);
            }
            None => out.push(b'~'),
        }

        let _ = ansi::erase_line(out);
        if y + 1 < viewport.rows {
            out.push_bytes(b"\r\n");
        }
    }
}

/// Centered banner: `~`, padding, message. Without room to pad, just the
/// (truncated) message.
fn draw_welcome(out: &mut OutputBuffer, cols: usize) {
    let message = welcome_message();
    let len = message.len().min(cols);
    let padding = (cols - len) / 2;

    if padding > 0 {
        out.push(b'~');
        out.push_repeated(b' ', padding - 1);
    }
    out.push_bytes(&message.as_bytes()[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn viewport(cols: usize, rows: usize, row_offset: usize) -> Viewport {
        Viewport {
            row_offset,
            rows,
            cols,
        }
    }

    fn text(out: &OutputBuffer) -> String {
        String::from_utf8_lossy(out.as_bytes()).into_owned()
    }

    fn rows_of(out: &OutputBuffer) -> Vec<String> {
        text(out).split("\r\n").map(str::to_owned).collect()
    }

    #[test]
    fn version_is_crate_version() {
        assert_eq!(VERSION, "0.0.1");
        assert_eq!(welcome_message(), "kilo editor -- version 0.0.1");
        assert_eq!(welcome_message().len(), 28);
    }

    // -- Welcome banner ------------------------------------------------------

    #[test]
    fn welcome_centered_at_80_columns() {
        let mut out = OutputBuffer::new();
        draw_welcome(&mut out, 80);
        let expected = format!("~{}kilo editor -- version 0.0.1", " ".repeat(25));
        assert_eq!(text(&out), expected);
    }

    #[test]
    fn welcome_row_in_full_frame() {
        let mut out = OutputBuffer::new();
        draw_rows(&mut out, &Document::empty(), &viewport(80, 6, 0));
        let rows = rows_of(&out);
        assert_eq!(rows.len(), 6);
        assert_eq!(
            rows[2],
            format!("~{}kilo editor -- version 0.0.1\x1b[K", " ".repeat(25))
        );
        for (i, row) in rows.iter().enumerate() {
            if i != 2 {
                assert_eq!(row, "~\x1b[K");
            }
        }
    }

    #[test]
    fn welcome_truncated_on_narrow_screen() {
        let mut out = OutputBuffer::new();
        draw_welcome(&mut out, 10);
        assert_eq!(text(&out), "kilo edito");
    }

    #[test]
    fn welcome_with_one_column_of_padding() {
        // (30 - 28) / 2 = 1: the tilde is the whole padding.
        let mut out = OutputBuffer::new();
        draw_welcome(&mut out, 30);
        assert_eq!(text(&out), "~kilo editor -- version 0.0.1");
    }

    #[test]
    fn no_welcome_when_document_has_rows() {
        let doc: Document = ["only"].into_iter().collect();
        let mut out = OutputBuffer::new();
        draw_rows(&mut out, &doc, &viewport(80, 6, 0));
        assert_eq!(
            rows_of(&out),
            vec!["only\x1b[K", "~\x1b[K", "~\x1b[K", "~\x1b[K", "~\x1b[K", "~\x1b[K"]
        );
    }

    // -- Document rows -------------------------------------------------------

    #[test]
    fn long_lines_are_truncated_not_wrapped() {
        let doc: Document = ["abcdefghij", "xy"].into_iter().collect();
        let mut out = OutputBuffer::new();
        draw_rows(&mut out, &doc, &viewport(4, 2, 0));
        assert_eq!(text(&out), "abcd\x1b[K\r\nxy\x1b[K");
    }

    #[test]
    fn rows_start_at_offset() {
        let doc: Document = ["0", "1", "2", "3", "4"].into_iter().collect();
        let mut out = OutputBuffer::new();
        draw_rows(&mut out, &doc, &viewport(10, 3, 3));
        assert_eq!(rows_of(&out), vec!["3\x1b[K", "4\x1b[K", "~\x1b[K"]);
    }

    #[test]
    fn last_row_has_no_newline() {
        let doc: Document = ["a"].into_iter().collect();
        let mut out = OutputBuffer::new();
        draw_rows(&mut out, &doc, &viewport(10, 3, 0));
        assert!(text(&out).ends_with("~\x1b[K"));
        assert_eq!(text(&out).matches("\r\n").count(), 2);
    }

    #[test]
    fn raw_bytes_pass_through() {
        let mut doc = Document::empty();
        doc.append_row(b"\xff\xfe");
        let mut out = OutputBuffer::new();
        draw_rows(&mut out, &doc, &viewport(10, 1, 0));
        assert_eq!(out.as_bytes(), b"\xff\xfe\x1b[K");
    }

    // -- Full frame ----------------------------------------------------------

    #[test]
    fn frame_layout() {
        let doc: Document = ["hello", "world"].into_iter().collect();
        let mut out = OutputBuffer::new();
        draw_frame(&mut out, &doc, &viewport(20, 2, 0), Cursor { x: 3, y: 1 });
        assert_eq!(
            text(&out),
            "\x1b[?25l\x1b[Hhello\x1b[K\r\nworld\x1b[K\x1b[2;4H\x1b[?25h"
        );
    }

    #[test]
    fn cursor_position_is_relative_to_offset() {
        let doc: Document = (0..50).map(|i| i.to_string()).collect();
        let mut out = OutputBuffer::new();
        draw_frame(&mut out, &doc, &viewport(20, 10, 30), Cursor { x: 0, y: 35 });
        assert!(text(&out).ends_with("\x1b[6;1H\x1b[?25h"));
    }
}
