// SPDX-License-Identifier: MIT
//
// Startup configuration from the environment.
//
// kilo takes no flags, so the few knobs it has live in environment
// variables, read once in `main`:
//
//   KILO_LOG   path of a log file; unset means no logging at all
//   RUST_LOG   tracing filter directives, default "info"

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the log file.
pub const LOG_FILE_VAR: &str = "KILO_LOG";

/// Environment variable holding the tracing filter.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

/// Filter used when `RUST_LOG` is unset or empty.
pub const DEFAULT_FILTER: &str = "info";

/// Settings gathered at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where tracing output goes. `None` disables logging.
    pub log_file: Option<PathBuf>,
    /// `EnvFilter` directives.
    pub log_filter: String,
}

impl Config {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(env::var_os)
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<OsString>) -> Self {
        let log_file = lookup(LOG_FILE_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let log_filter = lookup(LOG_FILTER_VAR)
            .and_then(|v| v.into_string().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_owned());

        Self {
            log_file,
            log_filter,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: None,
            log_filter: DEFAULT_FILTER.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(vars: &[(&str, &str)]) -> Config {
        Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| OsString::from(v))
        })
    }

    #[test]
    fn nothing_set_is_default() {
        assert_eq!(config(&[]), Config::default());
    }

    #[test]
    fn log_file_and_filter() {
        let c = config(&[("KILO_LOG", "/tmp/kilo.log"), ("RUST_LOG", "debug")]);
        assert_eq!(c.log_file, Some(PathBuf::from("/tmp/kilo.log")));
        assert_eq!(c.log_filter, "debug");
    }

    #[test]
    fn empty_values_fall_back() {
        let c = config(&[("KILO_LOG", ""), ("RUST_LOG", "  ")]);
        assert_eq!(c, Config::default());
    }
}
