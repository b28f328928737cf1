//! Atomic File Writer
//!
//! Stages new content under a private name and publishes it with a rename.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

use super::StagedFile;

/// Writes a file that only appears under its public name once complete
///
/// Opening is destructive: an existing file at the public path is
/// unlinked right away, not kept as a backup. Dropping the writer without
/// calling [`close`](Self::close), or a failed `close`, discards the staged
/// content, so a half-written file is never published.
#[derive(Debug)]
pub struct AtomicFileWriter {
    /// Public and staging names
    staged: StagedFile,
    /// Buffered handle on the staging file, `None` once consumed
    writer: Option<BufWriter<File>>,
    /// Bytes accepted so far
    bytes_written: u64,
}

impl AtomicFileWriter {
    /// Start staging `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_staged(StagedFile::new(path)?)
    }

    /// Start staging with an explicit staging record
    pub fn with_staged(staged: StagedFile) -> Result<Self> {
        if fs::symlink_metadata(staged.final_path()).is_ok() {
            fs::remove_file(staged.final_path())?;
            debug!(path = %staged.final_path().display(), "Removed previous file before staging");
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(staged.staging_path())?;

        debug!(
            path = %staged.final_path().display(),
            staging = %staged.staging_path().display(),
            "Staging file for write"
        );

        Ok(Self {
            staged,
            writer: Some(BufWriter::new(file)),
            bytes_written: 0,
        })
    }

    /// Append bytes to the staged file, returning how many were written
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.handle()?.write_all(buf)?;
        self.bytes_written += buf.len() as u64;
        Ok(buf.len())
    }

    /// Total bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn final_path(&self) -> &Path {
        self.staged.final_path()
    }

    pub fn staging_path(&self) -> &Path {
        self.staged.staging_path()
    }

    /// Flush, fsync and publish under the public name
    ///
    /// Returns the published path. On failure the staged file is
    /// discarded and nothing is published.
    pub fn close(mut self) -> Result<PathBuf> {
        let writer = self.writer.take();
        if let Err(e) = publish(&self.staged, writer) {
            self.discard();
            return Err(e.into());
        }

        debug!(
            path = %self.staged.final_path().display(),
            bytes = self.bytes_written,
            "Published staged file"
        );

        Ok(self.staged.final_path().to_path_buf())
    }

    fn discard(&self) {
        if let Err(e) = fs::remove_file(self.staged.staging_path()) {
            warn!(
                staging = %self.staged.staging_path().display(),
                error = %e,
                "Failed to discard unpublished staging file"
            );
        }
    }

    fn handle(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "writer already closed"))
    }
}

impl Write for AtomicFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.handle()?.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle()?.flush()
    }
}

fn publish(staged: &StagedFile, writer: Option<BufWriter<File>>) -> io::Result<()> {
    if let Some(writer) = writer {
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }
    fs::rename(staged.staging_path(), staged.final_path())
}

impl Drop for AtomicFileWriter {
    fn drop(&mut self) {
        // Only reached without close(): throw the partial content away
        if let Some(writer) = self.writer.take() {
            drop(writer);
            self.discard();
        }
    }
}
