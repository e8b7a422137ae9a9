//! jenkins-cleanup core: the sweep engine.
//!
//! This crate holds all behaviour with no CLI dependencies. The binary only
//! loads configuration, resolves the directory and runs a [`Sweeper`].
//!
//! # Modules
//!
//! - [`patterns`]: built-in name tables and entry classification.
//! - [`sweeper`]: list, age-filter, classify and delete one directory.
//! - [`delete`]: post-order recursive deletion.
//! - [`paths`]: resolving the configured directory to an absolute path.
//! - [`config`]: layered defaults / JSON file / environment settings.
//! - [`error`]: typed errors for sweeps, deletions and configuration.
pub mod config;
pub mod delete;
pub mod error;
pub mod paths;
pub mod patterns;
pub mod sweeper;

pub use config::{CleanupConfig, FailurePolicy};
pub use error::{ConfigError, DeleteError, SweepError};
pub use paths::resolve_directory;
pub use patterns::{EntryKind, Match, PatternTable};
pub use sweeper::{sweep, DeleteFn, SweepReport, Sweeper, MAX_AGE};
