//! Target directory resolution.
use std::path::{Component, Path, PathBuf};

/// Turn the configured directory string into an absolute path.
///
/// Absolute input is returned unchanged. Relative input is joined onto
/// `cwd` with `.` components dropped. `..` components are kept as-is so the
/// OS resolves them: collapsing `link/..` textually would land in `cwd`,
/// while the kernel follows `link` first and lands in the link target's
/// parent. The filesystem is not consulted here, so this never fails;
/// existence is checked by the sweeper.
pub fn resolve_directory(configured: &str, cwd: &Path) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() {
        return configured.to_path_buf();
    }

    cwd.join(configured)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn absolute_path_is_unchanged() {
        assert_eq!(
            resolve_directory("/var/tmp", Path::new("/home/jenkins")),
            PathBuf::from("/var/tmp")
        );
    }

    #[test]
    fn relative_path_is_joined_onto_cwd() {
        assert_eq!(
            resolve_directory("workspace/tmp", Path::new("/home/jenkins")),
            PathBuf::from("/home/jenkins/workspace/tmp")
        );
    }

    #[test]
    fn dot_components_are_dropped_parent_components_kept() {
        assert_eq!(
            resolve_directory("./tmp/../scratch/.", Path::new("/home/jenkins")),
            PathBuf::from("/home/jenkins/tmp/../scratch")
        );
    }

    #[test]
    fn parent_components_are_left_to_the_os() {
        assert_eq!(
            resolve_directory("../../tmp", Path::new("/opt")),
            PathBuf::from("/opt/../../tmp")
        );
    }

    #[test]
    fn empty_string_resolves_to_cwd() {
        assert_eq!(
            resolve_directory("", Path::new("/home/jenkins")),
            PathBuf::from("/home/jenkins")
        );
    }

    /// `link/..` must name the parent of the link's target, exactly as the
    /// kernel resolves it, not the working directory.
    #[test]
    fn parent_of_symlink_follows_the_link() {
        let cwd = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let nested = other.path().join("nested");
        fs::create_dir(&nested).unwrap();
        std::os::unix::fs::symlink(&nested, cwd.path().join("link")).unwrap();

        let resolved = resolve_directory("link/..", cwd.path());

        assert_eq!(
            fs::canonicalize(&resolved).unwrap(),
            fs::canonicalize(other.path()).unwrap()
        );
        assert_ne!(
            fs::canonicalize(&resolved).unwrap(),
            fs::canonicalize(cwd.path()).unwrap()
        );
    }
}
