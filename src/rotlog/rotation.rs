//! Version shift
//!
//! Moves `base` to `base-1`, `base-1` to `base-2` and so on, dropping
//! whatever falls past `version_count`. The steps are separate renames;
//! a failure part way leaves the chain as far as it got.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AcidError, Result};

/// `<base>-<n>`
pub fn rotated_path(base: &Path, n: u32) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!("-{}", n));
    PathBuf::from(name)
}

/// Shift every version of `base` one slot older
///
/// With `version_count == 0` no history is kept and `base` is removed.
/// `base` itself must be closed by the caller first.
pub fn shift_versions(base: &Path, version_count: u32) -> Result<()> {
    if version_count == 0 {
        if base.exists() {
            fs::remove_file(base).map_err(|e| step_error(base, base, e))?;
        }
        return Ok(());
    }

    // Oldest first so nothing is overwritten before it has moved
    for i in (1..version_count).rev() {
        let this = rotated_path(base, i);
        if !this.exists() {
            continue;
        }
        let next = rotated_path(base, i + 1);
        move_replacing(&this, &next)?;
    }

    if base.exists() {
        move_replacing(base, &rotated_path(base, 1))?;
    }

    debug!(base = %base.display(), versions = version_count, "Rotated log file");
    Ok(())
}

/// Rename `from` over `to`, deleting `to` first so this also works where
/// rename refuses to replace.
fn move_replacing(from: &Path, to: &Path) -> Result<()> {
    if to.exists() {
        fs::remove_file(to).map_err(|e| step_error(from, to, e))?;
    }
    fs::rename(from, to).map_err(|e| step_error(from, to, e))
}

fn step_error(from: &Path, to: &Path, source: io::Error) -> AcidError {
    AcidError::Rotation {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}
