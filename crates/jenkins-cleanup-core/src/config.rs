//! Run configuration.
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional JSON file, `JENKINS_CLEANUP_*` environment variables, then
//! whatever the caller applies on top (the binary's command-line flags).
//!
//! The JSON file nests everything under the `jenkins-cleanup` key:
//!
//! ```json
//! { "jenkins-cleanup": { "directory": "/var/tmp", "on-delete-failure": "continue" } }
//! ```
use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory swept when nothing else is configured.
pub const DEFAULT_DIRECTORY: &str = "/tmp";

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "jenkins-cleanup.json";

pub const ENV_DIRECTORY: &str = "JENKINS_CLEANUP_DIRECTORY";
pub const ENV_ON_DELETE_FAILURE: &str = "JENKINS_CLEANUP_ON_DELETE_FAILURE";

/// What the sweeper does when a matched entry cannot be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run and report the error. The process exits non-zero.
    #[default]
    Abort,
    /// Log the failure, record it in the report and move on to the next
    /// entry.
    Continue,
}

impl FailurePolicy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Continue => "continue",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupConfig {
    /// Target directory as configured; may be relative.
    pub directory: String,
    pub on_delete_failure: FailurePolicy,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_DIRECTORY.to_string(),
            on_delete_failure: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(rename = "jenkins-cleanup", default)]
    jenkins_cleanup: FileSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileSection {
    directory: Option<String>,
    on_delete_failure: Option<FailurePolicy>,
}

impl CleanupConfig {
    /// Defaults, then the config file, then the process environment.
    ///
    /// `explicit_file` must exist if given. Without it, `jenkins-cleanup.json`
    /// in `cwd` is used when present and silently skipped otherwise.
    pub fn load(explicit_file: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = match explicit_file {
            Some(path) => Some(path.to_path_buf()),
            None => Some(Self::default_file_in(cwd)).filter(|p| p.is_file()),
        };
        if let Some(path) = file {
            config.apply_file(&path)?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from a JSON config file.
    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: ConfigFile =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let section = parsed.jenkins_cleanup;
        if let Some(directory) = section.directory {
            self.directory = directory;
        }
        if let Some(policy) = section.on_delete_failure {
            self.on_delete_failure = policy;
        }
        Ok(())
    }

    /// Overlay values from environment variables, looked up through `var`
    /// so tests need not touch the real process environment. Empty values
    /// are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(directory) = var(ENV_DIRECTORY).filter(|v| !v.is_empty()) {
            self.directory = directory;
        }
        if let Some(policy) = var(ENV_ON_DELETE_FAILURE).filter(|v| !v.is_empty()) {
            self.on_delete_failure = policy.parse()?;
        }
        Ok(())
    }

    /// Where `load` would look for a config file in `cwd`.
    pub fn default_file_in(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_FILE)
    }
}
