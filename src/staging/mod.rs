//! Staging Module
//!
//! Rename-based atomic publication and exclusive acquisition of files.
//!
//! ## Responsibilities
//! - Derive a process-unique staging name for a target file
//! - Write new content under the staging name, publish with one rename
//! - Acquire an existing file by renaming it away, restore it on close
//! - List a directory without the staged entries, purge orphans
//!
//! ## Naming
//! ```text
//!   data/report.csv                 (public, stable)
//!   data/report.csv.4711.acid       (staged by pid 4711)
//! ```
//!
//! Any entry whose name ends in `acid` counts as staged, whoever made it.
//! Such names are hidden from listings, removed by cleanup, and refused as
//! public names.
//!
//! ## Visibility
//! ```text
//!   AtomicFileWriter::open ──► report.csv absent ──► close() ──► report.csv present
//!   AtomicFileReader::open ──► report.csv absent ──► close() ──► report.csv present
//! ```
//!
//! While a file is staged, its public name does not exist, so a second
//! `AtomicFileReader::open` sees `NotFound`. That exclusivity is a side
//! effect of rename and only holds on one filesystem. The exists-check and
//! the rename are two syscalls; two processes can both pass the check, in
//! which case the loser's rename fails and is reported as `NotFound`.
//! Layer an advisory lock on top if stronger guarantees are needed.
//!
//! Writers and readers are single-owner values. Sharing one across threads
//! needs external synchronization. Two handles in the same process on the
//! same public name share a staging name and will clobber each other.

mod staged;
mod writer;
mod reader;
mod dir;

pub use staged::{is_staged_name, StagedFile, StagingNamer, STAGING_SUFFIX, STAGING_TOKEN};
pub use writer::AtomicFileWriter;
pub use reader::AtomicFileReader;
pub use dir::DirectoryView;
