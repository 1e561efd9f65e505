// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Leveled diagnostics shared by the benchprep crates.
//!
//! The level comes from the `BENCHPREP_LOG` environment variable:
//! - `off` (default) - no logs
//! - `error`, `warn` - problems only
//! - `info` - one line per stage and file written
//! - `debug` - per-row decisions such as skipped malformed rows

use std::sync::Once;

// Re-export emit so the macros resolve from any crate
pub use emit;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "BENCHPREP_LOG";

static INIT: Once = Once::new();

/// Map a `BENCHPREP_LOG` value to a minimum level.
///
/// `Ok(None)` means logging is off. Unknown values are returned as `Err`
/// so the caller can fall back and say so.
pub fn parse_level(value: &str) -> Result<Option<emit::Level>, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => Ok(None),
        "error" => Ok(Some(emit::Level::Error)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "info" => Ok(Some(emit::Level::Info)),
        "debug" => Ok(Some(emit::Level::Debug)),
        other => Err(other.to_string()),
    }
}

/// Initialize diagnostics from `BENCHPREP_LOG`.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV).unwrap_or_default();
        let (level, unknown) = match parse_level(&raw) {
            Ok(Some(level)) => (level, None),
            Ok(None) => return,
            Err(unknown) => (emit::Level::Info, Some(unknown)),
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if let Some(value) = unknown {
            emit::warn!("Unknown {var} value {value}, using info", var: LOG_ENV, value: value);
        }

        // The runtime lives for the rest of the process
        std::mem::forget(rt);
    });
}

/// Stage progress: files read, rows written, stages finished
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Row-level detail: skipped rows, join sizes, intermediate counts
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Recoverable oddities: empty results, unused configuration, lenient skips
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Failures of a stage for one (workers, size) pair
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
