//! Structured logging with smoon's box-drawing output style.
//!
//! Every line goes through [`write_output`], prefixed with the pipe glyphs that
//! visually group related messages. Logging can be switched off entirely (JSON
//! output, tests) and debug lines are only printed when debug mode is on.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Main logging interface.
///
/// ## Conventions
///
/// - **`log_block_start!`** opens a new conceptual block (`┃` spacer, then `┣ message`).
/// - **`log_decorated!`** continues a block (`┣ message`).
/// - **`log_indented!`** lists details under the previous line (`┃   message`).
/// - **`log_pipe!`** inserts a bare `┃` before a leveled message that starts a block.
/// - **`log_version!`** / **`log_end!`** open and close the whole log.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`** carry a `[LEVEL]` tag.
///   `log_debug!` is silent unless [`Log::set_debug`] was called with `true`.
pub struct Log;

impl Log {
    /// Enable or disable all log output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }
}

// Public so the exported macros can reach it.
pub fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($lead:expr, $($arg:tt)+) => {{
        if $crate::logger::Log::is_enabled() {
            let message = format!($($arg)+);
            $crate::logger::write_output(&format!("{}{}\n", $lead, message));
        }
    }};
}

/// Log a message as part of the current block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣ ", $($arg)+)
    };
}

/// Log a detail line nested under the previous message.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃   ", $($arg)+)
    };
}

/// Log an empty pipe line for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!("", "┃")
    };
}

/// Start a new block of related messages.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {
        $crate::__log_line!("┃\n┣ ", $($arg)+)
    };
}

/// Log the application header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!("", "┏ smoon v{} ━━╸", env!("CARGO_PKG_VERSION"))
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!("", "╹")
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] ", $($arg)+)
    };
}

/// Log a warning in yellow.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] ", $($arg)+)
    };
}

/// Log an error in red.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] ", $($arg)+)
    };
}

/// Log an operational detail, only shown in debug mode.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {{
        if $crate::logger::Log::is_debug() {
            $crate::__log_line!("┣[\x1b[32mDEBUG\x1b[0m] ", $($arg)+)
        }
    }};
}
