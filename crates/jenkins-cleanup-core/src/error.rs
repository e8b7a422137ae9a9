//! Error types for the sweep engine.
//!
//! Failing to read an entry's modification time is deliberately absent from
//! this taxonomy: such entries are treated as ineligible and skipped (see
//! [`crate::sweeper`]). Everything here is a real failure that callers must
//! see.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A recursive deletion could not complete.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Removing a single file or directory failed for a reason other than
    /// the path already being gone.
    #[error("failed to delete '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The subtree walk itself failed (e.g. permission denied reading a
    /// nested directory).
    #[error("failed to walk '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl DeleteError {
    /// The path the failure refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Remove { path, .. } | Self::Walk { path, .. } => path,
        }
    }
}

/// A sweep run was aborted.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The target directory exists but could not be listed.
    #[error("failed to list directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A matched entry could not be deleted under the `abort` policy.
    #[error(transparent)]
    Delete(#[from] DeleteError),
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid delete-failure policy '{0}': expected 'abort' or 'continue'")]
    InvalidPolicy(String),
}
