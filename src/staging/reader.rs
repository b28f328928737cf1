//! Atomic File Reader
//!
//! Acquires a file by renaming it to its staging name, restores it on close.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AcidError, Result};

use super::StagedFile;

/// Exclusive reader over a public file
///
/// While held, the public name does not exist: other readers get
/// `NotFound` and directory listings skip it. [`close`](Self::close)
/// renames it back. Dropping without `close` also restores it, best-effort.
#[derive(Debug)]
pub struct AtomicFileReader {
    /// Public and staging names
    staged: StagedFile,
    /// Buffered handle on the staging file, `None` once consumed
    reader: Option<BufReader<File>>,
}

impl AtomicFileReader {
    /// Acquire `path`
    ///
    /// Returns `NotFound` when the file is absent or already acquired.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_staged(StagedFile::new(path)?)
    }

    /// Acquire with an explicit staging record
    pub fn with_staged(staged: StagedFile) -> Result<Self> {
        if !staged.final_path().exists() {
            return Err(AcidError::NotFound {
                path: staged.final_path().to_path_buf(),
            });
        }

        // Someone else may have won the race since the check above
        match fs::rename(staged.final_path(), staged.staging_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AcidError::NotFound {
                    path: staged.final_path().to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let file = match File::open(staged.staging_path()) {
            Ok(file) => file,
            Err(e) => {
                // Give the file back before reporting
                let _ = fs::rename(staged.staging_path(), staged.final_path());
                return Err(e.into());
            }
        };

        debug!(
            path = %staged.final_path().display(),
            staging = %staged.staging_path().display(),
            "Acquired file for read"
        );

        Ok(Self {
            staged,
            reader: Some(BufReader::new(file)),
        })
    }

    /// Read up to `n` bytes; fewer at end of file
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(n);
        self.handle()?.take(n as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Read one line including its terminator; empty string at end of file
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.handle()?.read_line(&mut line)?;
        Ok(line)
    }

    /// Read all remaining lines, terminators stripped
    pub fn read_lines(&mut self) -> Result<Vec<String>> {
        let lines = self.handle()?.lines().collect::<io::Result<Vec<_>>>()?;
        Ok(lines)
    }

    /// Read everything that remains
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.handle()?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Read everything that remains as UTF-8
    pub fn read_to_string(&mut self) -> Result<String> {
        let mut text = String::new();
        self.handle()?.read_to_string(&mut text)?;
        Ok(text)
    }

    pub fn final_path(&self) -> &Path {
        self.staged.final_path()
    }

    pub fn staging_path(&self) -> &Path {
        self.staged.staging_path()
    }

    /// Release the file under its public name again
    ///
    /// Returns the restored path.
    pub fn close(mut self) -> Result<PathBuf> {
        drop(self.reader.take());
        fs::rename(self.staged.staging_path(), self.staged.final_path())?;
        debug!(path = %self.staged.final_path().display(), "Released file");
        Ok(self.staged.final_path().to_path_buf())
    }

    fn handle(&mut self) -> io::Result<&mut BufReader<File>> {
        self.reader
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "reader already closed"))
    }
}

impl Read for AtomicFileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.handle()?.read(buf)
    }
}

impl BufRead for AtomicFileReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.handle()?.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        if let Some(reader) = self.reader.as_mut() {
            reader.consume(amt);
        }
    }
}

impl Drop for AtomicFileReader {
    fn drop(&mut self) {
        if self.reader.take().is_some() {
            if let Err(e) = fs::rename(self.staged.staging_path(), self.staged.final_path()) {
                warn!(
                    path = %self.staged.final_path().display(),
                    staging = %self.staged.staging_path().display(),
                    error = %e,
                    "Failed to restore acquired file"
                );
            }
        }
    }
}
