//! The sweep: list → filter by age → classify → delete.
//!
//! Only the immediate children of the target directory are classified.
//! Everything below a matched entry is wiped by [`delete_recursive`]
//! without further pattern checks.
//!
//! # Failure polarity
//!
//! Two kinds of I/O failure are handled in opposite ways:
//!
//! - An entry whose modification time cannot be read is **ineligible**. It
//!   is skipped and the run continues. Deleting something whose age is
//!   unknown is never acceptable.
//! - A failed deletion is a [`DeleteError`]. Under [`FailurePolicy::Abort`]
//!   it ends the run; under [`FailurePolicy::Continue`] it is logged,
//!   recorded in the [`SweepReport`] and the next entry is processed.
use crate::config::FailurePolicy;
use crate::delete::delete_recursive;
use crate::error::{DeleteError, SweepError};
use crate::patterns::{EntryKind, PatternTable};
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// Entries modified within this window are never touched.
pub const MAX_AGE: TimeDelta = TimeDelta::hours(6);

/// Outcome of one sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// The target directory did not exist; nothing was examined.
    pub directory_missing: bool,
    /// Immediate children looked at.
    pub examined: usize,
    /// Children skipped because they were modified after the cutoff.
    pub skipped_recent: usize,
    /// Children skipped because their age could not be read (stat failed,
    /// dangling symlink, no mtime on this platform).
    pub skipped_unreadable: usize,
    /// Matched entries that were removed.
    pub deleted: Vec<PathBuf>,
    /// Matched entries whose deletion failed under `FailurePolicy::Continue`.
    pub failures: Vec<DeleteError>,
}

/// Removes one matched entry and everything beneath it.
pub type DeleteFn = fn(&Path) -> Result<(), DeleteError>;

/// Sweeps one directory against a pattern table.
#[derive(Clone, Copy)]
pub struct Sweeper<'a> {
    patterns: &'a PatternTable,
    max_age: TimeDelta,
    on_delete_failure: FailurePolicy,
    delete: DeleteFn,
}

impl fmt::Debug for Sweeper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sweeper")
            .field("patterns", &self.patterns)
            .field("max_age", &self.max_age)
            .field("on_delete_failure", &self.on_delete_failure)
            .finish_non_exhaustive()
    }
}

impl Sweeper<'static> {
    /// Built-in patterns, six-hour cutoff, abort on the first failed delete.
    pub fn builtin() -> Self {
        Sweeper::new(PatternTable::builtin())
    }
}

impl<'a> Sweeper<'a> {
    pub fn new(patterns: &'a PatternTable) -> Self {
        Self {
            patterns,
            max_age: MAX_AGE,
            on_delete_failure: FailurePolicy::default(),
            delete: delete_recursive,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_delete_failure = policy;
        self
    }

    /// Replace [`delete_recursive`] with another deleter. Lets callers
    /// exercise the failure policy without an undeletable filesystem.
    pub fn with_deleter(mut self, delete: DeleteFn) -> Self {
        self.delete = delete;
        self
    }

    /// The instant entries must be at or before to be eligible.
    pub fn cutoff(&self, now: DateTime<Utc>) -> SystemTime {
        SystemTime::from(now - self.max_age)
    }

    /// Run one sweep of `directory` as of `now`.
    ///
    /// A missing directory is logged and reported, not an error. Failing to
    /// list an existing directory is [`SweepError::ReadDir`].
    pub fn sweep(&self, directory: &Path, now: DateTime<Utc>) -> Result<SweepReport, SweepError> {
        let mut report = SweepReport::default();

        if let Err(err) = fs::metadata(directory) {
            if err.kind() == io::ErrorKind::NotFound {
                warn!("Directory {} does not exist. Exiting.", directory.display());
                report.directory_missing = true;
                return Ok(report);
            }
        }

        // Computed once so every entry is judged against the same instant.
        let cutoff = self.cutoff(now);
        debug!(
            "Sweeping {} for entries last modified at or before {}",
            directory.display(),
            DateTime::<Utc>::from(cutoff).to_rfc3339()
        );

        let entries = fs::read_dir(directory).map_err(|source| SweepError::ReadDir {
            path: directory.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    debug!("Skipping unreadable entry in {}: {err}", directory.display());
                    continue;
                }
            };
            report.examined += 1;

            let path = entry.path();
            // Follows symlinks, so a link is classified by what it points at.
            let meta = match fs::metadata(&path) {
                Ok(m) => m,
                Err(err) => {
                    debug!("Skipping {}: cannot stat ({err})", path.display());
                    report.skipped_unreadable += 1;
                    continue;
                }
            };
            match modified_at_or_before(meta.modified(), cutoff) {
                Some(true) => {}
                Some(false) => {
                    report.skipped_recent += 1;
                    continue;
                }
                None => {
                    debug!("Skipping {}: modification time unavailable", path.display());
                    report.skipped_unreadable += 1;
                    continue;
                }
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(rule) = self.patterns.classify(&name, EntryKind::from_metadata(&meta)) else {
                continue;
            };
            debug!("{} matches {} '{}'", path.display(), rule.label(), rule.pattern());

            info!("Deleting {}", path.display());
            match (self.delete)(&path) {
                Ok(()) => report.deleted.push(path),
                Err(err) => match self.on_delete_failure {
                    FailurePolicy::Abort => return Err(err.into()),
                    FailurePolicy::Continue => {
                        warn!("Could not delete {}: {err}", path.display());
                        report.failures.push(err);
                    }
                },
            }
        }

        Ok(report)
    }
}

/// Sweep `directory` with the built-in configuration.
pub fn sweep(directory: &Path, now: DateTime<Utc>) -> Result<SweepReport, SweepError> {
    Sweeper::builtin().sweep(directory, now)
}

/// Whether `modified` is at or before `cutoff`, or `None` if the
/// modification time could not be read. Callers treat `None` as ineligible:
/// an entry of unknown age is never deleted.
fn modified_at_or_before(modified: io::Result<SystemTime>, cutoff: SystemTime) -> Option<bool> {
    modified.ok().map(|m| m <= cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs::File;
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn touch(path: &Path, modified: DateTime<Utc>) {
        File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::from(modified))
            .unwrap();
    }

    #[test]
    fn cutoff_is_six_hours_before_now() {
        let cutoff = Sweeper::builtin().cutoff(fixed_now());
        assert_eq!(
            DateTime::<Utc>::from(cutoff),
            Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap()
        );
    }

    /// Modified exactly at the cutoff is eligible (inclusive comparison).
    #[test]
    fn boundary_is_inclusive() {
        let tmp = TempDir::new().unwrap();
        let at_cutoff = tmp.path().join("winstone-boundary.jar");
        let just_after = tmp.path().join("winstone-fresh.jar");
        touch(&at_cutoff, fixed_now() - MAX_AGE);
        touch(&just_after, fixed_now() - MAX_AGE + TimeDelta::seconds(1));

        let report = sweep(tmp.path(), fixed_now()).unwrap();
        assert!(!at_cutoff.exists(), "entry at the cutoff must be deleted");
        assert!(just_after.exists(), "entry after the cutoff must survive");
        assert_eq!(report.deleted, vec![at_cutoff]);
        assert_eq!(report.skipped_recent, 1);
    }

    #[test]
    fn missing_directory_is_reported_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let report = sweep(&tmp.path().join("absent"), fixed_now()).unwrap();
        assert!(report.directory_missing);
        assert_eq!(report.examined, 0);
        assert!(report.deleted.is_empty());
    }

    #[test]
    fn non_directory_target_is_a_read_dir_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        touch(&file, fixed_now());

        let err = sweep(&file, fixed_now()).unwrap_err();
        assert!(matches!(err, SweepError::ReadDir { .. }), "got {err:?}");
    }

    /// A file matching both a prefix and a suffix is deleted once and
    /// reported once.
    #[test]
    fn double_match_is_deleted_once() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("tmp-thumb.jpg");
        touch(&file, fixed_now() - TimeDelta::hours(7));

        let report = sweep(tmp.path(), fixed_now()).unwrap();
        assert_eq!(report.deleted.len(), 1);
        assert!(!file.exists());
    }

    /// Deleter that refuses anything named `*-locked` and really deletes the
    /// rest.
    fn refuse_locked(path: &Path) -> Result<(), DeleteError> {
        let locked = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with("-locked"));
        if locked {
            return Err(DeleteError::Remove {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "refused"),
            });
        }
        delete_recursive(path)
    }

    fn stale_tree(root: &Path) {
        for name in ["winstone-locked", "winstone-a.jar", "hudson-b.log"] {
            touch(&root.join(name), fixed_now() - TimeDelta::hours(7));
        }
    }

    #[test]
    fn abort_policy_stops_on_first_failed_delete() {
        let tmp = TempDir::new().unwrap();
        stale_tree(tmp.path());

        let err = Sweeper::builtin()
            .with_deleter(refuse_locked)
            .sweep(tmp.path(), fixed_now())
            .unwrap_err();

        match err {
            SweepError::Delete(e) => assert_eq!(e.path(), tmp.path().join("winstone-locked")),
            other => panic!("expected a delete error, got {other:?}"),
        }
        assert!(tmp.path().join("winstone-locked").exists());
    }

    #[test]
    fn continue_policy_records_failure_and_finishes() {
        let tmp = TempDir::new().unwrap();
        stale_tree(tmp.path());

        let report = Sweeper::builtin()
            .with_failure_policy(FailurePolicy::Continue)
            .with_deleter(refuse_locked)
            .sweep(tmp.path(), fixed_now())
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path(), tmp.path().join("winstone-locked"));
        assert_eq!(report.deleted.len(), 2);
        assert!(!tmp.path().join("winstone-a.jar").exists());
        assert!(!tmp.path().join("hudson-b.log").exists());
    }

    /// An unreadable modification time is never eligible, whatever the
    /// cutoff.
    #[test]
    fn unreadable_mtime_is_ineligible() {
        let cutoff = SystemTime::now();
        let unsupported = io::Error::new(io::ErrorKind::Unsupported, "no mtime");
        assert_eq!(modified_at_or_before(Err(unsupported), cutoff), None);
        assert_eq!(
            modified_at_or_before(Ok(SystemTime::UNIX_EPOCH), cutoff),
            Some(true)
        );
        assert_eq!(modified_at_or_before(Ok(cutoff), cutoff), Some(true));
    }

    #[test]
    fn with_failure_policy_overrides_default() {
        let sweeper = Sweeper::builtin();
        assert_eq!(sweeper.on_delete_failure, FailurePolicy::Abort);
        let sweeper = sweeper.with_failure_policy(FailurePolicy::Continue);
        assert_eq!(sweeper.on_delete_failure, FailurePolicy::Continue);
    }
}
