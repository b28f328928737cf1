//! Line rendering
//!
//! Pure helpers; the sink decides which parts (timestamp, tag) apply.

use std::error::Error;

use chrono::Local;

use crate::config::TagStyle;

use super::Level;

/// `strftime` layout of line timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time in [`TIMESTAMP_FORMAT`]
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Render one physical line, newline included
///
/// `[<timestamp> ]<LEVEL> [<tag>] <text>\n`
pub fn render_line(
    timestamp: Option<&str>,
    level: Level,
    tag: Option<&str>,
    style: TagStyle,
    text: &str,
) -> String {
    let mut line = String::with_capacity(text.len() + 40);
    if let Some(ts) = timestamp {
        line.push_str(ts);
        line.push(' ');
    }
    line.push_str(level.label());
    line.push(' ');
    if let Some(tag) = tag {
        match style {
            TagStyle::Bracketed => {
                line.push('[');
                line.push_str(tag);
                line.push_str("] ");
            }
            TagStyle::Colon => {
                line.push_str(tag);
                line.push_str(": ");
            }
        }
    }
    line.push_str(text);
    line.push('\n');
    line
}

/// Physical lines of a message, blank ones dropped
pub fn split_lines(message: &str) -> impl Iterator<Item = &str> {
    message
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
}

/// An error followed by its `source()` chain, one per line
pub fn format_error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str("\ncaused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
