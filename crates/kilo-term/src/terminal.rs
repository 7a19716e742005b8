// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, size probing, and guaranteed restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), and raw fd writes. These are the standard
// POSIX interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode is a scoped acquisition. `RawMode::enable` saves the original
// termios into a single process-wide slot and returns a guard; dropping the
// guard restores it. Restoring *takes* the saved value out of the slot, so
// however many paths try to restore (explicit `disable`, guard drop, the
// panic hook) the terminal is reset exactly once.
//
// The panic hook bypasses Rust's stdout lock and writes the clear sequence
// straight to fd 1, then restores termios, then lets the original hook
// print its message to a working terminal.
//
// Size probing asks the driver first (TIOCGWINSZ). Some terminals answer
// with zero columns; for those we park the cursor in the far bottom-right
// corner and ask the terminal where it ended up (DSR 6).

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::{Error, Result};
use crate::reader::ByteSource;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if the call fails or the driver reports zero columns.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Longest cursor report we accept, terminator excluded.
const REPORT_CAPACITY: usize = 32;

/// Determine the terminal size.
///
/// Tries [`get_size`] and falls back to the cursor-report protocol, writing
/// the queries to `out` and reading the reply from `input`. Raw mode must be
/// on for the fallback, otherwise the reply sits in the line buffer.
///
/// # Errors
///
/// Returns [`Error::WindowSize`] if the reply can't be parsed, or the
/// write/read error that interrupted the exchange.
pub fn probe_size(out: &mut impl Write, input: &mut impl ByteSource) -> Result<Size> {
    probe_size_with(get_size(), out, input)
}

/// [`probe_size`] with the primary answer supplied by the caller.
///
/// # Errors
///
/// Same as [`probe_size`].
pub fn probe_size_with(
    primary: Option<Size>,
    out: &mut impl Write,
    input: &mut impl ByteSource,
) -> Result<Size> {
    if let Some(size) = primary {
        tracing::debug!(cols = size.cols, rows = size.rows, "window size from TIOCGWINSZ");
        return Ok(size);
    }

    ansi::cursor_to_bottom_right(out).map_err(Error::Write)?;
    ansi::request_cursor_position(out).map_err(Error::Write)?;
    out.flush().map_err(Error::Write)?;

    let mut report = [0u8; REPORT_CAPACITY];
    let mut len = 0;
    while len < REPORT_CAPACITY - 1 {
        match input.read_byte()? {
            Some(b'R') | None => break,
            Some(byte) => {
                report[len] = byte;
                len += 1;
            }
        }
    }

    let size = parse_cursor_report(&report[..len]).ok_or(Error::WindowSize)?;
    tracing::debug!(cols = size.cols, rows = size.rows, "window size from cursor report");
    Ok(size)
}

/// Parse a DSR reply with its trailing `R` already stripped: `ESC [ rows ; cols`.
///
/// Anything after the column number is ignored.
#[must_use]
pub fn parse_cursor_report(report: &[u8]) -> Option<Size> {
    let body = report.strip_prefix(b"\x1b[")?;
    let (rows, rest) = leading_number(body)?;
    let rest = rest.strip_prefix(b";")?;
    let (cols, _) = leading_number(rest)?;
    Some(Size { cols, rows })
}

/// Split a run of ASCII digits off the front of `bytes`.
fn leading_number(bytes: &[u8]) -> Option<(u16, &[u8])> {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let value = bytes[..digits].iter().try_fold(0u16, |acc, &b| {
        acc.checked_mul(10)?.checked_add(u16::from(b - b'0'))
    })?;
    Some((value, &bytes[digits..]))
}

// ─── Fatal Teardown ─────────────────────────────────────────────────────────

/// Clear the screen and home the cursor before a fatal exit.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn clear_for_exit(w: &mut impl Write) -> io::Result<()> {
    ansi::clear_screen(w)?;
    ansi::cursor_home(w)?;
    w.flush()
}

// ─── Saved TerminalConfig ───────────────────────────────────────────────────

/// The original termios, captured by [`RawMode::enable`].
///
/// One slot for the whole process. Whoever restores first takes it.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Put the saved termios back, if it's still there.
///
/// Returns `Ok(true)` if this call did the restore.
#[cfg(unix)]
fn restore_saved() -> Result<bool> {
    let saved = SAVED_TERMIOS
        .lock()
        .map_or_else(|poisoned| poisoned.into_inner().take(), |mut guard| guard.take());

    let Some(original) = saved else {
        return Ok(false);
    };

    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0 {
        return Err(Error::config("tcsetattr"));
    }
    Ok(true)
}

#[cfg(not(unix))]
fn restore_saved() -> Result<bool> {
    Ok(false)
}

/// Fatal-exit screen sequence for the panic hook.
const PANIC_CLEAR: &[u8] = b"\x1b[2J\x1b[H";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that clears the screen and restores the terminal.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_clear();
            let _ = restore_saved();
            original(info);
        }));
    });
}

/// Write [`PANIC_CLEAR`] directly to stdout's file descriptor.
///
/// Bypasses `io::stdout()` so a panic in the middle of a frame flush
/// can't deadlock on the stdout lock.
fn emergency_clear() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            PANIC_CLEAR.as_ptr().cast::<libc::c_void>(),
            PANIC_CLEAR.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(PANIC_CLEAR);
        let _ = io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Read timing applied while raw mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawConfig {
    /// `VMIN`: bytes a read waits for. 0 lets reads return empty-handed.
    pub min_bytes: u8,
    /// `VTIME`: read timeout in tenths of a second.
    pub timeout_ds: u8,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            min_bytes: 0,
            timeout_ds: 1,
        }
    }
}

/// Apply raw-mode flags to a copy of the original termios.
///
/// Off: software flow control, CR→NL translation, break-to-SIGINT, parity
/// checking, 8th-bit stripping, output post-processing, echo, canonical
/// mode, signal keys, and `IEXTEN` (Ctrl-V). On: 8-bit characters.
#[cfg(unix)]
fn make_raw(mut termios: libc::termios, config: RawConfig) -> libc::termios {
    termios.c_iflag &= !(libc::IXON | libc::ICRNL | libc::BRKINT | libc::INPCK | libc::ISTRIP);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cc[libc::VMIN] = config.min_bytes;
    termios.c_cc[libc::VTIME] = config.timeout_ds;
    termios
}

/// Scoped raw mode.
///
/// While the guard lives, stdin delivers unprocessed bytes and reads time
/// out after [`RawConfig::timeout_ds`]. Dropping it restores the original
/// settings, so early returns through `?` leave the terminal usable.
///
/// # Example
///
/// ```no_run
/// use kilo_term::terminal::RawMode;
///
/// let _raw = RawMode::enable()?;
/// // ... render frames, read keys ...
/// // Terminal is restored when `_raw` goes out of scope.
/// # Ok::<(), kilo_term::Error>(())
/// ```
#[derive(Debug)]
pub struct RawMode {
    active: bool,
}

impl RawMode {
    /// Enter raw mode with the default 100ms read timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalConfig`] if the attributes can't be read
    /// or written (including when stdin is not a terminal).
    pub fn enable() -> Result<Self> {
        Self::enable_with(RawConfig::default())
    }

    /// Enter raw mode with custom read timing.
    ///
    /// # Errors
    ///
    /// Same as [`enable`](Self::enable).
    #[cfg(unix)]
    pub fn enable_with(config: RawConfig) -> Result<Self> {
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut original) } != 0 {
            return Err(Error::config("tcgetattr"));
        }

        install_panic_hook();

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(original);
        }

        let raw = make_raw(original, config);
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const raw) } != 0 {
            let err = Error::config("tcsetattr");
            let _ = restore_saved();
            return Err(err);
        }

        tracing::info!(?config, "raw mode enabled");
        Ok(Self { active: true })
    }

    #[cfg(not(unix))]
    pub fn enable_with(_config: RawConfig) -> Result<Self> {
        Ok(Self { active: false })
    }

    /// Whether this guard still owns a pending restore.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the original terminal settings now.
    ///
    /// Idempotent. After this the guard's drop does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalConfig`] if `tcsetattr` fails.
    pub fn disable(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        if restore_saved()? {
            tracing::info!("raw mode disabled");
        }
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.disable() {
            tracing::error!(%err, "failed to restore terminal");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
