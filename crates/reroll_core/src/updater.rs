//! Auto-update suppression
//!
//! The editor's updater looks for a writable directory at a fixed
//! location. Replacing that directory with a zero-byte regular file
//! makes every update attempt fail fast without touching the editor
//! itself. Harmless to repeat and trivially undone by deleting the
//! placeholder.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use crate::error::ResetError;

/// Replace the updater path with a zero-byte placeholder file
///
/// Whatever currently occupies the path (directory tree, file,
/// symlink, or nothing at all) ends up as an empty regular file.
/// Failures map to [`ResetError::SuppressFailed`] so the caller can
/// treat them as non-fatal.
pub fn suppress(path: &Path) -> Result<(), ResetError> {
    remove_existing(path).map_err(ResetError::SuppressFailed)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ResetError::SuppressFailed)?;
        }
    }

    fs::File::create(path).map_err(ResetError::SuppressFailed)?;
    debug!("updater placeholder in place: {}", path.display());
    Ok(())
}

/// Remove whatever sits at `path`; absence is success
fn remove_existing(path: &Path) -> io::Result<()> {
    // symlink_metadata so a link to elsewhere is removed as a link,
    // not followed into its target
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
