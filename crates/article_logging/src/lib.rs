#![deny(missing_docs)]
//! Shared logging utilities for the article creator workspace.
//!
//! This crate provides the `article_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Messages logged from a
//! thread that has a run id set are prefixed with `[run N]`, so interleaved
//! output from consecutive runs can be told apart.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local storage for the id of the run executing on this thread.
    static RUN_ID: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Sets the run id for the current thread.
/// The job runner calls this once when its worker thread starts.
pub fn set_run_id(run_id: u64) {
    RUN_ID.with(|v| v.set(Some(run_id)));
}

/// Clears the run id for the current thread.
pub fn clear_run_id() {
    RUN_ID.with(|v| v.set(None));
}

/// Retrieves the run id for the current thread, if one is set.
pub fn current_run_id() -> Option<u64> {
    RUN_ID.with(|v| v.get())
}

/// Shared body of the `article_*` macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __article_log {
    ($level:expr, $($arg:tt)*) => {{
        match $crate::current_run_id() {
            Some(run_id) => $crate::__log::log!(
                $level,
                "[run {}] {}",
                run_id,
                format_args!($($arg)*)
            ),
            None => $crate::__log::log!($level, $($arg)*),
        }
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! article_trace {
    ($($arg:tt)*) => {
        $crate::__article_log!($crate::__log::Level::Trace, $($arg)*)
    };
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! article_debug {
    ($($arg:tt)*) => {
        $crate::__article_log!($crate::__log::Level::Debug, $($arg)*)
    };
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! article_info {
    ($($arg:tt)*) => {
        $crate::__article_log!($crate::__log::Level::Info, $($arg)*)
    };
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! article_warn {
    ($($arg:tt)*) => {
        $crate::__article_log!($crate::__log::Level::Warn, $($arg)*)
    };
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! article_error {
    ($($arg:tt)*) => {
        $crate::__article_log!($crate::__log::Level::Error, $($arg)*)
    };
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already have installed the logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
