// SPDX-License-Identifier: MIT
//
// Tracing setup.
//
// stdout is the screen, so logs can never go there. When a log file is
// configured, a fmt layer writes plain (no ANSI) lines to it, filtered by
// the configured `EnvFilter` directives. Otherwise no subscriber is
// installed and every `tracing` macro is a no-op.

use std::fs::File;
use std::io;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Config, DEFAULT_FILTER};

/// Install the global subscriber described by `config`.
///
/// Returns `Ok(false)` when logging is not configured.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn init(config: &Config) -> io::Result<bool> {
    let Some(path) = &config.log_file else {
        return Ok(false);
    };
    let file = File::create(path)?;
    // A subscriber may already be set (tests, embedding); keep that one.
    let installed = build_subscriber(file, &config.log_filter).try_init().is_ok();
    Ok(installed)
}

/// Subscriber writing to `log_file`, filtered by `directives`.
///
/// Unparseable directives fall back to the default filter.
pub fn build_subscriber(
    log_file: File,
    directives: &str,
) -> impl tracing::Subscriber + Send + Sync + use<> {
    let env_filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
