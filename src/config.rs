//! Configuration for the rotating log sink
//!
//! Centralized configuration with sensible defaults. Can be built in code
//! through [`LogConfigBuilder`] or loaded from a TOML document.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AcidError, Result};

/// Default size at which the live log file is rotated away
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 100_000;

/// Default number of rotated-away versions kept on disk
pub const DEFAULT_VERSION_COUNT: u32 = 10;

/// Configuration for a [`RotatingLogSink`](crate::rotlog::RotatingLogSink)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Path of the live log file. Historical versions live next to it:
    ///   {base_path}      (live, appended to)
    ///   {base_path}-1    (most recently rotated)
    ///   ...
    ///   {base_path}-N    (oldest, N = version_count)
    pub base_path: PathBuf,

    /// Rotate once the live file reaches this many bytes (0 = never)
    pub max_size_bytes: u64,

    /// Number of historical files to keep
    pub version_count: u32,

    /// Rotate once when the sink is constructed, before any write.
    /// Gives every run its own file.
    pub rotate_on_open: bool,

    // -------------------------------------------------------------------------
    // Message Configuration
    // -------------------------------------------------------------------------
    /// Label placed in front of every message
    pub program_tag: Option<String>,

    /// Emit debug-level messages
    pub verbose: bool,

    /// How lines are rendered on the console
    pub console: ConsoleStyle,
}

/// Console rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleStyle {
    /// Prefix console lines with the same timestamp the file copy carries
    pub timestamps: bool,

    /// How the program tag is rendered, on both console and file
    pub tag_style: TagStyle,
}

/// Rendering of the program tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStyle {
    /// `INFO  [myprog] message`
    #[default]
    Bracketed,

    /// `INFO  myprog: message`
    Colon,
}

impl Default for ConsoleStyle {
    fn default() -> Self {
        Self {
            timestamps: false,
            tag_style: TagStyle::Bracketed,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            version_count: DEFAULT_VERSION_COUNT,
            rotate_on_open: false,
            program_tag: None,
            verbose: false,
            console: ConsoleStyle::default(),
        }
    }
}

impl LogConfig {
    /// Create a new config builder
    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }

    /// Parse a config from TOML text
    ///
    /// Missing keys take their defaults. Not validated here, so a caller
    /// can still fill in `base_path`; the sink validates on configure.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AcidError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check the invariants a sink relies on
    pub fn validate(&self) -> Result<()> {
        if self.base_path.as_os_str().is_empty() {
            return Err(AcidError::Config("base_path is required".to_string()));
        }
        if self.base_path.file_name().is_none() {
            return Err(AcidError::Config(format!(
                "base_path {} does not name a file",
                self.base_path.display()
            )));
        }
        Ok(())
    }

    /// Whether size-triggered rotation is active
    pub fn rotates_by_size(&self) -> bool {
        self.max_size_bytes > 0
    }
}

/// Builder for LogConfig
#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    /// Set the live log file path
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_path = path.into();
        self
    }

    /// Set the rotation threshold (in bytes, 0 disables size rotation)
    pub fn max_size_bytes(mut self, size: u64) -> Self {
        self.config.max_size_bytes = size;
        self
    }

    /// Set the number of historical versions kept
    pub fn version_count(mut self, count: u32) -> Self {
        self.config.version_count = count;
        self
    }

    /// Rotate once at construction
    pub fn rotate_on_open(mut self, enabled: bool) -> Self {
        self.config.rotate_on_open = enabled;
        self
    }

    /// Set the program tag
    pub fn program_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.program_tag = Some(tag.into());
        self
    }

    /// Enable or disable debug output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Set the console rendering style
    pub fn console(mut self, style: ConsoleStyle) -> Self {
        self.config.console = style;
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}
