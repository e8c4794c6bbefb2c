#![deny(missing_docs)]
//! Shared logging utilities for the cloner workspace.
//!
//! Every crate logs through the `cloner_*` macros so that records carry the
//! same target and can be filtered as one unit.

use std::sync::Once;

/// Log target attached to every record emitted by the `cloner_*` macros.
pub const TARGET: &str = "cloner";

/// Logs a trace-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! cloner_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! cloner_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! cloner_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! cloner_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the [`TARGET`] target.
#[macro_export]
macro_rules! cloner_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Parses a level name such as `"info"` or `"DEBUG"`.
///
/// Unknown names yield `None` so callers can keep their default.
pub fn parse_level(name: &str) -> Option<log::LevelFilter> {
    name.trim().parse().ok()
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from every test: the first call installs the logger and the
/// rest are no-ops, as is any call made after another logger was installed.
pub fn initialize_for_tests() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

        let level = if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };

        let _ = CombinedLogger::init(vec![TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )]);
    });
}
