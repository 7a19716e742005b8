// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources — where decoded keys come from.
//
// In raw mode with VMIN=0 / VTIME=1, read() on stdin returns after at most
// 100ms whether or not a byte arrived. That timeout is the only suspension
// point in the whole program, and it is not an error: a source reports it
// as `Ok(None)` and callers simply ask again.
//
// The key decoder and the size probe are written against the `ByteSource`
// trait rather than stdin directly, so tests drive them from a byte slice.

use std::io;

use crate::error::{Error, Result};

/// A blocking-with-timeout source of single bytes.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(None)` when the read timed out with no data (or was
    /// interrupted, or the descriptor is non-blocking and empty).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] for any other read failure.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── Stdin ──────────────────────────────────────────────────────────────────

/// Raw, unbuffered stdin.
///
/// Reads go straight to `read(2)` on fd 0. `std::io::Stdin` would add a
/// userspace buffer that swallows bytes the decoder wants one at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdin;

impl Stdin {
    /// Handle to fd 0.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for Stdin {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if is_benign(&err) {
                    Ok(None)
                } else {
                    Err(Error::Read(err))
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for Stdin {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(err) if is_benign(&err) => Ok(None),
            Err(err) => Err(Error::Read(err)),
        }
    }
}

/// Whether a read error just means "nothing yet".
fn is_benign(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

// ─── SliceSource ────────────────────────────────────────────────────────────

/// In-memory byte source.
///
/// Yields the slice one byte at a time, then reports timeouts forever.
/// Used by tests and for replaying recorded input.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Source over `bytes`.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.bytes.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slice_source_yields_then_times_out() {
        let mut src = SliceSource::new(b"ab");
        assert_eq!(src.read_byte().unwrap(), Some(b'a'));
        assert_eq!(src.read_byte().unwrap(), Some(b'b'));
        assert_eq!(src.read_byte().unwrap(), None);
        assert_eq!(src.read_byte().unwrap(), None);
    }

    #[test]
    fn slice_source_remaining() {
        let mut src = SliceSource::new(b"xyz");
        src.read_byte().unwrap();
        assert_eq!(src.remaining(), b"yz");
    }

    #[test]
    fn mut_ref_is_a_source() {
        fn first(mut source: impl ByteSource) -> Option<u8> {
            source.read_byte().unwrap()
        }

        let mut src = SliceSource::new(b"q");
        assert_eq!(first(&mut src), Some(b'q'));
        assert_eq!(src.remaining(), b"");
    }

    #[test]
    fn benign_errors() {
        assert!(is_benign(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_benign(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(!is_benign(&io::Error::from(io::ErrorKind::BrokenPipe)));
    }
}
