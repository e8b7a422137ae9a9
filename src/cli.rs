//! Command-line flags. They sit on top of every other configuration layer.
use clap::Parser;
use jenkins_cleanup_core::{CleanupConfig, FailurePolicy};
use std::path::PathBuf;

/// Delete stale build-tool leftovers (older than six hours) from a
/// build server's temp directory.
#[derive(Debug, Parser)]
#[command(name = "jenkins-cleanup", version, about)]
pub struct Cli {
    /// Directory to sweep. Relative paths are resolved against the working
    /// directory. Defaults to /tmp.
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<String>,

    /// JSON config file. Without this flag, ./jenkins-cleanup.json is read
    /// if it exists.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// What to do when a matched entry cannot be deleted: abort or continue.
    #[arg(long, value_name = "POLICY")]
    pub on_delete_failure: Option<FailurePolicy>,

    /// Log skipped entries and rule matches as well as deletions.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut CleanupConfig) {
        if let Some(directory) = &self.directory {
            config.directory.clone_from(directory);
        }
        if let Some(policy) = self.on_delete_failure {
            config.on_delete_failure = policy;
        }
    }
}
