//! Temp-file commit protocol.
//!
//! Given a freshly written file representing the desired next state, swap it
//! in for the current archive file via a two-step rename so a crash between
//! steps always leaves one of three recoverable states: only
//! the temp file exists, `old` exists and `current` doesn't (restore by
//! rename), or both exist (the commit finished, cleanup didn't).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub fn old_path(current: &Path) -> PathBuf {
    sibling_with_suffix(current, "_old")
}

pub fn tmp_path(current: &Path) -> PathBuf {
    sibling_with_suffix(current, "_tmp")
}

pub fn tmp2_path(current: &Path) -> PathBuf {
    sibling_with_suffix(current, "_tmp2")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Commits `tmp` as the new contents of `current`:
///
/// 1. (repair, if any, already applied by the caller; `tmp2` is the result)
/// 2. delete any stale `old`
/// 3. rename `current` -> `old`
/// 4. copy `tmp2` -> `current`, rolling `old` back on failure
/// 5. remove `tmp2` and `tmp`
///
/// `tmp` and `tmp2` may be the same path when no repair pass is needed.
pub fn commit(current: &Path, tmp: &Path, tmp2: &Path) -> Result<(), Error> {
    let old = old_path(current);

    if old.exists() {
        fs::remove_file(&old).map_err(|e| Error::CommitFailed(e.to_string()))?;
    }

    if current.exists() {
        fs::rename(current, &old).map_err(|e| Error::CommitFailed(e.to_string()))?;
    }

    if let Err(copy_err) = fs::copy(tmp2, current) {
        // best-effort rollback; surface the original copy failure either way
        let _ = fs::rename(&old, current);
        return Err(Error::CommitFailed(copy_err.to_string()));
    }

    let _ = fs::remove_file(tmp2);
    if tmp != tmp2 {
        let _ = fs::remove_file(tmp);
    }
    let _ = fs::remove_file(&old);

    Ok(())
}
