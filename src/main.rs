//! jenkins-cleanup: removes stale build-tool leftovers from a build
//! server's temp directory.
//!
//! Thin binary entry point. All logic lives in `jenkins-cleanup-core`;
//! this file loads configuration, resolves the target directory and runs
//! exactly one sweep. Exit code is 0 whether or not anything was deleted
//! or the directory existed; a fatal deletion error exits non-zero.
mod cli;

use anyhow::Context;
use clap::Parser;
use jenkins_cleanup_core::{resolve_directory, CleanupConfig, Sweeper};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let mut config = CleanupConfig::load(cli.config.as_deref(), &cwd)
        .context("failed to load configuration")?;
    cli.apply(&mut config);

    let directory = resolve_directory(&config.directory, &cwd);
    tracing::debug!(
        "jenkins-cleanup starting: directory={}, on-delete-failure={}",
        directory.display(),
        config.on_delete_failure
    );

    let report = Sweeper::builtin()
        .with_failure_policy(config.on_delete_failure)
        .sweep(&directory, chrono::Utc::now())?;

    if !report.directory_missing {
        tracing::info!(
            "Sweep of {} complete: {} examined, {} too recent, {} unreadable, {} deleted, {} failed",
            directory.display(),
            report.examined,
            report.skipped_recent,
            report.skipped_unreadable,
            report.deleted.len(),
            report.failures.len()
        );
    }

    Ok(())
}
