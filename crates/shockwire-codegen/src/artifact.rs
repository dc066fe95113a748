//! Committing rendered plans to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Writes a rendered plan for `revision` into `dir`, atomically.
///
/// The rendering goes to `<revision>.plan.staging` first and is renamed
/// over `<revision>.plan` only once fully written, so a run that fails
/// midway never corrupts a previously committed artifact. Returns the
/// committed path.
pub fn commit_artifact(dir: &Path, revision: &str, rendered: &str) -> io::Result<PathBuf> {
    let staging = dir.join(format!("{revision}.plan.staging"));
    let target = dir.join(format!("{revision}.plan"));

    fs::write(&staging, rendered)?;
    if let Err(err) = fs::rename(&staging, &target) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }

    debug!(revision, path = %target.display(), "artifact committed");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_writes_the_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = commit_artifact(dir.path(), "RELEASE9", "plan body\n").unwrap();
        assert_eq!(path, dir.path().join("RELEASE9.plan"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "plan body\n");
        assert!(!dir.path().join("RELEASE9.plan.staging").exists());
    }

    #[test]
    fn test_commit_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        commit_artifact(dir.path(), "RELEASE9", "old\n").unwrap();
        commit_artifact(dir.path(), "RELEASE9", "new\n").unwrap();
        let body = fs::read_to_string(dir.path().join("RELEASE9.plan")).unwrap();
        assert_eq!(body, "new\n");
    }

    #[test]
    fn test_failed_commit_leaves_previous_artifact_intact() {
        let dir = tempfile::tempdir().unwrap();
        commit_artifact(dir.path(), "RELEASE9", "committed\n").unwrap();

        // A staging write into a missing directory fails before the
        // rename, so the committed file is untouched.
        let missing = dir.path().join("gone");
        assert!(commit_artifact(&missing, "RELEASE9", "doomed\n").is_err());
        let body = fs::read_to_string(dir.path().join("RELEASE9.plan")).unwrap();
        assert_eq!(body, "committed\n");
    }
}
