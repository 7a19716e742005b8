// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal control for the kilo viewer.
//
// Raw mode as a scoped guard, window-size probing with a cursor-report
// fallback, a byte-at-a-time key decoder for the handful of escape
// sequences a line viewer cares about, and a frame buffer that reaches
// the terminal in exactly one write.
//
// No TUI framework sits underneath. Raw termios via libc and hand-written
// escape sequences; every byte sent to the terminal is accounted for.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::{Error, Result};
