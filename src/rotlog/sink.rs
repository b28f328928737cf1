//! Rotating Log Sink
//!
//! Writes leveled messages to the console and to a size-rotated file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::config::{ConsoleStyle, LogConfig};
use crate::error::Result;

use super::format::{render_line, split_lines, timestamp_now};
use super::rotation::shift_versions;
use super::{Level, Stream};

/// Leveled logger writing to stdout/stderr and, once configured, a file
///
/// ## States
/// - Unconfigured (`console_only`): console output only
/// - Configured (`open` / `configure`): console and file
///
/// ## Concurrency
/// All state sits behind one mutex, so `&self` methods can be called from
/// several threads; each message is written as a unit. Two sinks on the
/// same `base_path` is misuse: their writes and rotations interleave.
pub struct RotatingLogSink {
    state: Mutex<SinkState>,
}

/// Everything the sink mutates
struct SinkState {
    verbose: bool,
    program_tag: Option<String>,
    console_style: ConsoleStyle,
    stdout: Box<dyn Write + Send>,
    stderr: Box<dyn Write + Send>,
    /// `None` while unconfigured
    target: Option<LogTarget>,
}

/// The live log file and its rotation policy
struct LogTarget {
    base_path: PathBuf,
    max_size_bytes: u64,
    version_count: u32,
    /// `None` between closing for rotation and reopening
    file: Option<File>,
    /// Bytes in the live file
    size: u64,
}

impl RotatingLogSink {
    /// Sink that only writes to the console
    pub fn console_only() -> Self {
        Self {
            state: Mutex::new(SinkState {
                verbose: false,
                program_tag: None,
                console_style: ConsoleStyle::default(),
                stdout: Box::new(io::stdout()),
                stderr: Box::new(io::stderr()),
                target: None,
            }),
        }
    }

    /// Sink writing to the console and to `config.base_path`
    pub fn open(config: LogConfig) -> Result<Self> {
        let sink = Self::console_only();
        sink.configure(config)?;
        Ok(sink)
    }

    /// Replace the console streams, e.g. to capture output
    pub fn with_console(
        mut self,
        stdout: impl Write + Send + 'static,
        stderr: impl Write + Send + 'static,
    ) -> Self {
        let state = self.state.get_mut();
        state.stdout = Box::new(stdout);
        state.stderr = Box::new(stderr);
        self
    }

    /// Point the sink at a (new) log file
    ///
    /// Creates the parent directory if needed. With `rotate_on_open`, an
    /// existing file is rotated away first so the run starts empty.
    pub fn configure(&self, config: LogConfig) -> Result<()> {
        config.validate()?;

        if let Some(parent) = config.base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut state = self.state.lock();
        // Release the old handle before touching any file
        state.target = None;

        if config.rotate_on_open && config.base_path.exists() {
            shift_versions(&config.base_path, config.version_count)?;
        }

        let mut target = LogTarget {
            base_path: config.base_path.clone(),
            max_size_bytes: config.max_size_bytes,
            version_count: config.version_count,
            file: None,
            size: 0,
        };
        target.live_file()?;

        debug!(
            path = %config.base_path.display(),
            size = target.size,
            max_size = config.max_size_bytes,
            versions = config.version_count,
            "Log file configured"
        );

        state.verbose = config.verbose;
        state.program_tag = config.program_tag;
        state.console_style = config.console;
        state.target = Some(target);
        Ok(())
    }

    // =========================================================================
    // Emitting
    // =========================================================================

    /// Write a message at `level`
    ///
    /// Debug messages are dropped unless verbose. Every non-blank line of
    /// the message gets its own prefix. Errors from the console or the file
    /// are returned as-is.
    pub fn emit(&self, level: Level, message: &str) -> Result<()> {
        let mut state = self.state.lock();
        if level == Level::Debug && !state.verbose {
            return Ok(());
        }
        state.write_message(level, message)
    }

    /// Stdout and file, only when verbose
    pub fn debug(&self, message: &str) -> Result<()> {
        self.emit(Level::Debug, message)
    }

    /// Stdout and file
    pub fn info(&self, message: &str) -> Result<()> {
        self.emit(Level::Info, message)
    }

    /// Stderr and file
    pub fn warn(&self, message: &str) -> Result<()> {
        self.emit(Level::Warn, message)
    }

    /// Stderr and file, then terminate the process with status 1
    ///
    /// Write and flush failures are ignored; the exit happens regardless.
    pub fn fatal(&self, message: &str) -> ! {
        let _ = self.emit(Level::Fatal, message);
        let _ = self.flush();
        std::process::exit(1)
    }

    /// Flush the console streams and sync the live file
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.stdout.flush()?;
        state.stderr.flush()?;
        if let Some(file) = state.target.as_mut().and_then(|t| t.file.as_mut()) {
            file.sync_data()?;
        }
        Ok(())
    }

    /// Close the log file; the sink falls back to console only
    pub fn close(&self) -> Result<()> {
        self.flush()?;
        self.state.lock().target = None;
        Ok(())
    }

    // =========================================================================
    // Runtime Settings
    // =========================================================================

    pub fn set_verbose(&self, verbose: bool) {
        self.state.lock().verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.state.lock().verbose
    }

    /// Set or clear the label placed in front of every message
    pub fn set_program_tag(&self, tag: Option<String>) {
        self.state.lock().program_tag = tag;
    }

    pub fn program_tag(&self) -> Option<String> {
        self.state.lock().program_tag.clone()
    }

    pub fn is_configured(&self) -> bool {
        self.state.lock().target.is_some()
    }

    /// Path of the live log file, if configured
    pub fn base_path(&self) -> Option<PathBuf> {
        self.state.lock().target.as_ref().map(|t| t.base_path.clone())
    }

    /// Bytes in the live log file, if configured
    pub fn current_size(&self) -> Option<u64> {
        self.state.lock().target.as_ref().map(|t| t.size)
    }
}

impl SinkState {
    fn write_message(&mut self, level: Level, message: &str) -> Result<()> {
        let timestamp = timestamp_now();
        let console_ts = self.console_style.timestamps.then_some(timestamp.as_str());
        let tag = self.program_tag.as_deref();
        let style = self.console_style.tag_style;

        for text in split_lines(message) {
            let console_line = render_line(console_ts, level, tag, style, text);
            let stream = match level.stream() {
                Stream::Stdout => &mut self.stdout,
                Stream::Stderr => &mut self.stderr,
            };
            stream.write_all(console_line.as_bytes())?;

            if let Some(target) = self.target.as_mut() {
                let file_line = render_line(Some(&timestamp), level, tag, style, text);
                target.append(file_line.as_bytes())?;
            }
        }
        Ok(())
    }
}

impl LogTarget {
    /// Append one line, rotating once the size limit is reached
    fn append(&mut self, line: &[u8]) -> Result<()> {
        self.live_file()?.write_all(line)?;
        self.size += line.len() as u64;

        if self.max_size_bytes > 0 && self.size >= self.max_size_bytes {
            self.rotate()?;
        }
        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        shift_versions(&self.base_path, self.version_count)?;
        self.live_file()?;
        Ok(())
    }

    /// The open live file, opening (or reopening) it in append mode
    fn live_file(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let file = open_append(&self.base_path)?;
                self.size = file.metadata()?.len();
                file
            }
        };
        Ok(self.file.insert(file))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
