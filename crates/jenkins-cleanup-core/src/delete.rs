//! Post-order recursive deletion.
//!
//! Uses `walkdir` with `contents_first(true)` so every directory is empty by
//! the time it is removed. Symlinks are never followed, not even at the
//! root: a matched link is removed as a link and its target survives.
use crate::error::DeleteError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Delete `path` and everything beneath it.
///
/// Returns `Ok(())` without touching anything if `path` is already gone.
/// Files or directories that disappear mid-walk (another process cleaning
/// the same tree) are not errors.
pub fn delete_recursive(path: &Path) -> Result<(), DeleteError> {
    match fs::symlink_metadata(path) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => {
            return Err(DeleteError::Remove {
                path: path.to_path_buf(),
                source: err,
            })
        }
    }

    let walker = WalkDir::new(path)
        .follow_links(false)
        .follow_root_links(false)
        .contents_first(true);

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) if is_not_found(&err) => continue,
            Err(err) => {
                let err_path = err.path().unwrap_or(path).to_path_buf();
                return Err(DeleteError::Walk {
                    path: err_path,
                    source: err,
                });
            }
        };

        if entry.file_type().is_dir() {
            remove_if_exists(entry.path(), |p| fs::remove_dir(p))?;
        } else {
            remove_if_exists(entry.path(), |p| fs::remove_file(p))?;
        }
    }

    Ok(())
}

/// Run `remove` on `path`, treating "already absent" as success.
fn remove_if_exists(
    path: &Path,
    remove: impl FnOnce(&Path) -> io::Result<()>,
) -> Result<(), DeleteError> {
    match remove(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{} vanished before it could be removed", path.display());
            Ok(())
        }
        Err(err) => Err(DeleteError::Remove {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}
