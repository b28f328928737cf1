//! Error types for acidlog
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using AcidError
pub type Result<T> = std::result::Result<T, AcidError>;

/// Unified error type for acidlog operations
#[derive(Debug, Error)]
pub enum AcidError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Staging Errors
    // -------------------------------------------------------------------------
    /// The file is absent, or currently acquired by another reader.
    #[error("File not found (absent or busy): {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    // -------------------------------------------------------------------------
    // Rotation Errors
    // -------------------------------------------------------------------------
    /// A step of the version shift failed. Earlier steps are not undone,
    /// so the `base-N` chain may have a gap.
    #[error("Rotation failed moving {} to {}: {source}", from.display(), to.display())]
    Rotation {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AcidError {
    /// True for `NotFound`, which callers treat as "absent or busy".
    pub fn is_not_found(&self) -> bool {
        matches!(self, AcidError::NotFound { .. })
    }
}
