//! Document — the lines of the file being viewed.
//!
//! A `Document` is an ordered list of [`Line`]s, one per physical line of the
//! source file. Lines are raw bytes: no UTF-8 validation, no re-encoding. The
//! only thing stripped on load is the line terminator, and both `\n` and
//! `\r\n` endings are handled (any run of trailing `\r`/`\n` goes).
//!
//! Documents only grow while loading. Nothing in the viewer mutates them
//! afterwards.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to load a document from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("fopen {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but reading it failed part-way.
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// One line of the document, terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    chars: Vec<u8>,
}

impl Line {
    /// A line holding exactly `bytes`.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            chars: bytes.into(),
        }
    }

    /// The line's bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the line has no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Read-only, line-oriented text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    /// An empty document (zero rows).
    #[must_use]
    pub const fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    /// Load `path` line by line.
    ///
    /// # Errors
    ///
    /// [`LoadError::Open`] if the file can't be opened, [`LoadError::Read`]
    /// if reading fails afterwards.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Self::from_reader(BufReader::new(file)).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), rows = doc.len(), "document loaded");
        Ok(doc)
    }

    /// Read lines from any buffered reader, splitting on `\n`.
    ///
    /// # Errors
    ///
    /// Propagates read errors from `reader`.
    pub fn from_reader(mut reader: impl BufRead) -> io::Result<Self> {
        let mut doc = Self::empty();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            doc.append_row(strip_line_ending(&buf));
        }
        Ok(doc)
    }

    /// Append one row at the end.
    pub fn append_row(&mut self, bytes: &[u8]) {
        self.lines.push(Line::new(bytes));
    }

    /// Number of rows (`totalRows`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The row at `index`, if any.
    #[inline]
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// All rows in file order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }
}

impl<B: AsRef<[u8]>> FromIterator<B> for Document {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(|b| Line::new(b.as_ref())).collect(),
        }
    }
}

/// Drop every trailing `\n` and `\r`.
fn strip_line_ending(mut bytes: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = bytes {
        bytes = rest;
    }
    bytes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
