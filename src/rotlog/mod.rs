//! Rotating Log Module
//!
//! Leveled text logging to the console and to a size-bounded file.
//!
//! ## Responsibilities
//! - Render leveled, tagged, timestamped lines
//! - Route each level to stdout or stderr, and to the log file
//! - Rotate the log file once it reaches its size limit
//! - Keep at most `version_count` rotated-away files
//!
//! ## On Disk
//! ```text
//!   app.log      ◄── live, appended to
//!   app.log-1    ◄── most recently rotated
//!   app.log-2
//!   ...
//!   app.log-N    ◄── oldest kept, N = version_count
//! ```
//!
//! ## Routing
//! ```text
//!   debug ──► stdout + file   (only when verbose)
//!   info  ──► stdout + file
//!   warn  ──► stderr + file
//!   fatal ──► stderr + file, then exit(1)
//! ```

mod format;
mod rotation;
mod sink;
pub mod global;

pub use format::{format_error_chain, render_line, split_lines, timestamp_now, TIMESTAMP_FORMAT};
pub use rotation::{rotated_path, shift_versions};
pub use sink::RotatingLogSink;

use std::fmt;

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Fatal,
}

/// Console stream a level is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Level {
    /// Level name padded to a fixed width of 5
    pub fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO ",
            Level::Warn => "WARN ",
            Level::Fatal => "FATAL",
        }
    }

    pub fn stream(self) -> Stream {
        match self {
            Level::Debug | Level::Info => Stream::Stdout,
            Level::Warn | Level::Fatal => Stream::Stderr,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}

/// Log a debug message with `format!` arguments
///
/// The message is only formatted when the sink is verbose.
#[macro_export]
macro_rules! log_debug {
    ($sink:expr, $($arg:tt)+) => {{
        let sink = &$sink;
        if sink.is_verbose() {
            sink.debug(&::std::format!($($arg)+))
        } else {
            ::std::result::Result::<(), $crate::AcidError>::Ok(())
        }
    }};
}

/// Log an info message with `format!` arguments
#[macro_export]
macro_rules! log_info {
    ($sink:expr, $($arg:tt)+) => {
        $sink.info(&::std::format!($($arg)+))
    };
}

/// Log a warning with `format!` arguments
#[macro_export]
macro_rules! log_warn {
    ($sink:expr, $($arg:tt)+) => {
        $sink.warn(&::std::format!($($arg)+))
    };
}

/// Log a fatal message with `format!` arguments and exit with status 1
#[macro_export]
macro_rules! log_fatal {
    ($sink:expr, $($arg:tt)+) => {
        $sink.fatal(&::std::format!($($arg)+))
    };
}
