//! # acidlog
//!
//! Safe file lifecycle in a shared directory:
//! - Atomic, rename-based publication of newly written files
//! - Exclusive acquisition of existing files for reading
//! - Directory listings that hide staged files
//! - A leveled console + file logger with size-based rotation
//!
//! ## Architecture Overview
//!
//! ```text
//!   staging                              rotlog
//!   ───────                              ──────
//!   AtomicFileWriter ─┐                  RotatingLogSink
//!   AtomicFileReader ─┼─► rename            ├──► stdout / stderr
//!   DirectoryView ────┘                     └──► log file
//!          │                                        │ size limit
//!          ▼                                        ▼
//!   StagingNamer: <file>.<pid>.acid          shift_versions: log-1 .. log-N
//! ```
//!
//! No guarantee is made beyond what a single `rename` gives: no
//! cross-filesystem atomicity and no locking between processes.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod staging;
pub mod rotlog;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AcidError, Result};
pub use config::{ConsoleStyle, LogConfig, TagStyle};
pub use staging::{AtomicFileReader, AtomicFileWriter, DirectoryView, StagedFile, StagingNamer};
pub use rotlog::{Level, RotatingLogSink};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of acidlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
