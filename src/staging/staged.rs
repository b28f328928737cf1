//! Staging names
//!
//! Maps a public file name to the name it carries while staged.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::{AcidError, Result};

/// Trailing token of every staging name
pub const STAGING_SUFFIX: &str = ".acid";

/// Any entry name ending in this token counts as staged
pub const STAGING_TOKEN: &str = "acid";

/// Derives staging names: `<final_path>.<pid>.acid`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingNamer {
    pid: u32,
}

impl StagingNamer {
    /// Namer for the current process
    pub fn current() -> Self {
        Self::for_process(std::process::id())
    }

    /// Namer for an arbitrary process id
    pub fn for_process(pid: u32) -> Self {
        Self { pid }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Staging path for `final_path`
    ///
    /// Built on `OsString` so non-UTF-8 names survive untouched.
    pub fn staging_path(&self, final_path: &Path) -> PathBuf {
        let mut name = OsString::from(final_path.as_os_str());
        name.push(format!(".{}{}", self.pid, STAGING_SUFFIX));
        PathBuf::from(name)
    }
}

/// Whether a directory entry name is a staging name
///
/// Matches on the bare token, so names like `placid` are also treated as
/// staged and never listed.
pub fn is_staged_name(name: &OsStr) -> bool {
    name.to_string_lossy().ends_with(STAGING_TOKEN)
}

/// A public path paired with its staging path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    final_path: PathBuf,
    staging_path: PathBuf,
    owner_pid: u32,
}

impl StagedFile {
    /// Staging record for `final_path`, owned by the current process
    pub fn new(final_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_namer(final_path, StagingNamer::current())
    }

    pub fn with_namer(final_path: impl AsRef<Path>, namer: StagingNamer) -> Result<Self> {
        let final_path = final_path.as_ref();
        let name = final_path.file_name().ok_or_else(|| {
            AcidError::InvalidPath(format!("{} does not name a file", final_path.display()))
        })?;
        if is_staged_name(name) {
            return Err(AcidError::InvalidPath(format!(
                "{} ends in the staging token",
                final_path.display()
            )));
        }

        Ok(Self {
            final_path: final_path.to_path_buf(),
            staging_path: namer.staging_path(final_path),
            owner_pid: namer.pid(),
        })
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    pub fn owner_pid(&self) -> u32 {
        self.owner_pid
    }
}
