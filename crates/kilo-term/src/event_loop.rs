// SPDX-License-Identifier: MIT
//
// Event loop — draw, read, dispatch, repeat.
//
// Strictly single-threaded. Each turn paints a complete frame into an
// `OutputBuffer`, flushes it with one write, then blocks on the next key.
// The only waiting happens inside the byte source's read, which returns
// every ~100ms when idle; the decoder swallows those timeouts and keeps
// reading, so the loop itself never spins on an empty turn.
//
// When the application asks to quit, the loop paints one last frame and
// returns. Restoring the terminal is not the loop's job: the caller holds
// the `RawMode` guard and drops it after `run` comes back.

use std::io::Write;

use crate::error::{Error, Result};
use crate::input::{Key, KeyDecoder};
use crate::output::OutputBuffer;
use crate::reader::ByteSource;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Paint a final frame and exit the loop.
    Quit,
}

/// Application interface for the event loop.
pub trait App {
    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to leave the loop.
    fn on_key(&mut self, key: Key) -> Action;

    /// Paint the whole screen into `out`.
    ///
    /// `out` is empty on entry and is flushed in a single write on return.
    fn paint(&mut self, out: &mut OutputBuffer);
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Drives an [`App`] from a byte source to an output sink.
///
/// # Example
///
/// ```no_run
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::input::Key;
/// use kilo_term::output::{OutputBuffer, RawStdout};
/// use kilo_term::reader::Stdin;
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_key(&mut self, key: Key) -> Action {
///         if key == Key::ctrl(b'q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, out: &mut OutputBuffer) {
///         out.push_bytes(b"\x1b[Hpress ctrl-q");
///     }
/// }
///
/// let mut event_loop = EventLoop::new(Stdin::new(), RawStdout::new());
/// event_loop.run(&mut Quitter)?;
/// # Ok::<(), kilo_term::Error>(())
/// ```
#[derive(Debug)]
pub struct EventLoop<S, W> {
    decoder: KeyDecoder<S>,
    sink: W,
    frame: OutputBuffer,
    frames: u64,
}

impl<S: ByteSource, W: Write> EventLoop<S, W> {
    /// Loop reading keys from `source` and writing frames to `sink`.
    pub fn new(source: S, sink: W) -> Self {
        Self {
            decoder: KeyDecoder::new(source),
            sink,
            frame: OutputBuffer::new(),
            frames: 0,
        }
    }

    /// Frames flushed so far.
    #[inline]
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Give back the output sink.
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if reading input fails and [`Error::Write`]
    /// if a frame can't be written.
    pub fn run(&mut self, app: &mut impl App) -> Result<()> {
        loop {
            self.draw(app)?;
            let key = self.decoder.read_key()?;
            if app.on_key(key) == Action::Quit {
                tracing::info!(frames = self.frames, "quit requested");
                return self.draw(app);
            }
        }
    }

    /// Paint one frame and flush it in a single write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the sink rejects the frame.
    pub fn draw(&mut self, app: &mut impl App) -> Result<()> {
        self.frame.clear();
        app.paint(&mut self.frame);
        self.frame.flush_to(&mut self.sink).map_err(Error::Write)?;
        self.frames += 1;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
