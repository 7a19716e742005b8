// SPDX-License-Identifier: MIT
//
// kilo — a small terminal line viewer.
//
// This binary wires the two crates together:
//
//   kilo-term   → raw mode, size probing, key decoding, event loop
//   kilo-editor → document, viewport, renderer, key dispatch
//
// Startup order matters: raw mode first (the size fallback reads the
// terminal's reply from stdin, which only works unbuffered), then the
// size probe, then the file. Each keypress flows through:
//
//   stdin → KeyDecoder → Editor::dispatch → cursor / viewport
//   Editor::refresh → OutputBuffer → one write() → terminal
//
// Every failure returns through `run`, which drops the raw-mode guard on
// the way out. `main` then clears the screen, prints the diagnostic, and
// exits with status 1.

mod config;
mod logging;

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use kilo_editor::document::{Document, LoadError};
use kilo_editor::editor::Editor;
use kilo_term::event_loop::EventLoop;
use kilo_term::output::RawStdout;
use kilo_term::reader::Stdin;
use kilo_term::terminal::{self, RawMode};
use thiserror::Error;

use config::Config;

/// Anything that ends the program with status 1.
#[derive(Debug, Error)]
enum Fatal {
    #[error(transparent)]
    Terminal(#[from] kilo_term::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let config = Config::from_env();
    if let Err(e) = logging::init(&config) {
        eprintln!("kilo: cannot open log file: {e}");
    }

    let path = env::args_os().nth(1).map(PathBuf::from);

    match run(path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => die(&err),
    }
}

/// The whole session. Raw mode is restored when this returns, however it
/// returns; on the quit path a failed restore is fatal.
fn run(path: Option<&Path>) -> Result<(), Fatal> {
    let mut raw = RawMode::enable()?;
    let mut stdin = Stdin::new();

    let size = terminal::probe_size(&mut RawStdout::new(), &mut stdin)?;
    tracing::info!(cols = size.cols, rows = size.rows, "terminal size");

    let document = match path {
        Some(path) => Document::load(path)?,
        None => Document::empty(),
    };

    let mut editor = Editor::new(document, size);
    EventLoop::new(stdin, RawStdout::new()).run(&mut editor)?;
    raw.disable()?;
    Ok(())
}

/// Fatal teardown: clear, report, fail.
fn die(err: &Fatal) -> ExitCode {
    tracing::error!(%err, "fatal");

    let _ = terminal::clear_for_exit(&mut RawStdout::new());

    eprintln!("kilo: {err}");
    ExitCode::FAILURE
}

// ─── Tests ──────────────────────────────────────────────────────────────────
