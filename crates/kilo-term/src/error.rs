// SPDX-License-Identifier: MIT
//
// Error types for terminal control.
//
// Every variant here is fatal to the viewer. The one benign condition in
// the whole pipeline, a read that times out with zero bytes, never becomes
// an `Error`: byte sources report it as `Ok(None)`.

use std::io;

use thiserror::Error;

/// Failures while driving the terminal.
#[derive(Debug, Error)]
pub enum Error {
    /// `tcgetattr` or `tcsetattr` failed.
    #[error("{op}: {source}")]
    TerminalConfig {
        /// The failing call, e.g. `"tcgetattr"`.
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// Reading stdin failed with something other than a timeout.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing a frame or a terminal query failed.
    #[error("write: {0}")]
    Write(#[source] io::Error),

    /// Neither `TIOCGWINSZ` nor the cursor-report fallback produced a size.
    #[error("getWindowSize: unable to determine terminal dimensions")]
    WindowSize,
}

/// Result alias for terminal operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap the current `errno` as a [`TerminalConfig`](Self::TerminalConfig) error.
    #[must_use]
    pub fn config(op: &'static str) -> Self {
        Self::TerminalConfig {
            op,
            source: io::Error::last_os_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_call() {
        let err = Error::TerminalConfig {
            op: "tcsetattr",
            source: io::Error::other("not a tty"),
        };
        assert!(err.to_string().starts_with("tcsetattr: "));
    }

    #[test]
    fn window_size_message() {
        assert_eq!(
            Error::WindowSize.to_string(),
            "getWindowSize: unable to determine terminal dimensions"
        );
    }

    #[test]
    fn read_error_keeps_source() {
        use std::error::Error as _;
        let err = Error::Read(io::Error::other("boom"));
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("boom"));
    }
}
