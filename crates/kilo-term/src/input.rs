// SPDX-License-Identifier: MIT
//
// Key decoding.
//
// Turns the raw byte stream from a `ByteSource` into logical keys. A key is
// one of three things: a literal byte, a named key (arrows, Home/End,
// Delete, Page Up/Down), or a bare Escape.
//
// # Grammar
//
//   byte != ESC              → Char(byte)
//   ESC [ A|B|C|D|H|F        → Up, Down, Right, Left, Home, End
//   ESC [ 1|7 ~              → Home
//   ESC [ 4|8 ~              → End
//   ESC [ 3 ~                → Delete
//   ESC [ 5 ~ / ESC [ 6 ~    → PageUp / PageDown
//   ESC O H|F                → Home, End
//   anything else after ESC  → Escape
//
// # Design
//
// Decoding is a small explicit state machine. `step` is pure: given a state
// and the next byte (or `None` when the read timed out) it either finishes
// with a key or moves to the next state. Lookahead is bounded at three
// bytes after ESC. A timeout anywhere inside a sequence abandons it and
// yields Escape, so a lone ESC keypress resolves after one read quantum.
//
// Unknown sequences are consumed, not replayed: `ESC [ Z` eats all three
// bytes and produces one Escape. Nothing here can fail except the
// underlying read.

use crate::error::Result;
use crate::reader::ByteSource;

/// The ESC byte.
pub const ESC: u8 = 0x1b;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A decoded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single literal byte (printable or control).
    Char(u8),
    /// A recognised escape sequence.
    Named(NamedKey),
    /// A lone ESC, or an escape sequence we don't understand.
    Escape,
}

/// Keys that arrive as multi-byte escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
}

impl Key {
    /// The key produced by holding Ctrl with `letter`.
    ///
    /// Terminals send the letter with its top three bits cleared, so
    /// `Key::ctrl(b'q')` is `Char(0x11)`.
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self::Char(letter & 0x1f)
    }
}

impl From<NamedKey> for Key {
    fn from(named: NamedKey) -> Self {
        Self::Named(named)
    }
}

// ─── State Machine ──────────────────────────────────────────────────────────

/// Where the decoder is inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Saw ESC, waiting for the introducer.
    Escape,
    /// Saw ESC and one more byte, waiting for the byte that decides.
    Intro(u8),
    /// Saw `ESC [ digit`, waiting for `~`.
    CsiParam(u8),
}

/// Outcome of feeding one byte to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next(State),
    Done(Key),
}

/// Advance the escape-sequence machine by one byte.
///
/// `None` means the read timed out, which abandons the sequence.
fn step(state: State, byte: Option<u8>) -> Step {
    let Some(byte) = byte else {
        return Step::Done(Key::Escape);
    };

    match state {
        State::Escape => Step::Next(State::Intro(byte)),
        State::Intro(b'[') if byte.is_ascii_digit() => Step::Next(State::CsiParam(byte)),
        State::Intro(b'[') => Step::Done(csi_final(byte).map_or(Key::Escape, Key::Named)),
        State::Intro(b'O') => Step::Done(ss3_final(byte).map_or(Key::Escape, Key::Named)),
        State::Intro(_) => Step::Done(Key::Escape),
        State::CsiParam(digit) if byte == b'~' => {
            Step::Done(tilde_param(digit).map_or(Key::Escape, Key::Named))
        }
        State::CsiParam(_) => Step::Done(Key::Escape),
    }
}

/// `ESC [ <letter>`
const fn csi_final(byte: u8) -> Option<NamedKey> {
    match byte {
        b'A' => Some(NamedKey::ArrowUp),
        b'B' => Some(NamedKey::ArrowDown),
        b'C' => Some(NamedKey::ArrowRight),
        b'D' => Some(NamedKey::ArrowLeft),
        b'H' => Some(NamedKey::Home),
        b'F' => Some(NamedKey::End),
        _ => None,
    }
}

/// `ESC O <letter>`
const fn ss3_final(byte: u8) -> Option<NamedKey> {
    match byte {
        b'H' => Some(NamedKey::Home),
        b'F' => Some(NamedKey::End),
        _ => None,
    }
}

/// `ESC [ <digit> ~`
const fn tilde_param(digit: u8) -> Option<NamedKey> {
    match digit {
        b'1' | b'7' => Some(NamedKey::Home),
        b'3' => Some(NamedKey::Delete),
        b'4' | b'8' => Some(NamedKey::End),
        b'5' => Some(NamedKey::PageUp),
        b'6' => Some(NamedKey::PageDown),
        _ => None,
    }
}

// ─── KeyDecoder ─────────────────────────────────────────────────────────────

/// Reads keys from a byte source.
#[derive(Debug)]
pub struct KeyDecoder<S> {
    source: S,
}

impl<S: ByteSource> KeyDecoder<S> {
    /// Decoder pulling bytes from `source`.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Block until a full key is available and return it.
    ///
    /// Timeouts before the first byte are retried indefinitely. Timeouts
    /// inside an escape sequence end it with [`Key::Escape`].
    ///
    /// # Errors
    ///
    /// Propagates read failures from the source.
    pub fn read_key(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = self.poll_key()? {
                return Ok(key);
            }
        }
    }

    /// Read one key if any input is pending, without retrying on timeout.
    ///
    /// Returns `Ok(None)` when the first read times out.
    ///
    /// # Errors
    ///
    /// Propagates read failures from the source.
    pub fn poll_key(&mut self) -> Result<Option<Key>> {
        match self.source.read_byte()? {
            None => Ok(None),
            Some(ESC) => self.finish_escape().map(Some),
            Some(byte) => Ok(Some(Key::Char(byte))),
        }
    }

    /// Run the state machine after an ESC until it produces a key.
    fn finish_escape(&mut self) -> Result<Key> {
        let mut state = State::Escape;
        loop {
            let byte = self.source.read_byte()?;
            match step(state, byte) {
                Step::Next(next) => state = next,
                Step::Done(key) => {
                    if key == Key::Escape && byte.is_some() {
                        tracing::debug!(?state, last = byte, "unrecognised escape sequence");
                    }
                    return Ok(key);
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
