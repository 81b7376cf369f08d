use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::convert::Project;
use crate::git::{CommandError, RepoDriver};
use crate::logger::Logger;

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("'{0}' is not a git repository")]
    NotARepository(String),
    #[error("output path already exists: {}", .0.display())]
    OutputExists(PathBuf),
    #[error("failed to remove {}: {source}", path.display())]
    RemoveOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to prepare {}: {source}", path.display())]
    PrepareOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to clone: {0}")]
    Clone(#[source] CommandError),
}

/// Clone `project` into `output`, which names the final directory.
///
/// The project is re-checked to be a repository here rather than trusting
/// the caller. Anything at `output`, a dangling symlink included, is an
/// error unless `force` is set, in which case it is removed first: a real
/// directory recursively, a file or symlink by unlinking it. Missing parents
/// of `output` are created.
///
/// # Errors
/// - [`CloneError::OutputExists`] when `output` exists and `force` is off;
///   nothing is deleted in that case.
/// - [`CloneError::Clone`] carries git's diagnostic text as-is.
pub fn clone_project(
    project: &Project,
    output: &Path,
    force: bool,
    driver: &dyn RepoDriver,
    log: &Logger,
) -> Result<PathBuf, CloneError> {
    if !driver.is_repository(&project.path) {
        return Err(CloneError::NotARepository(project.name.clone()));
    }

    if output_exists(output) {
        if !force {
            return Err(CloneError::OutputExists(output.to_path_buf()));
        }
        log.warn(format!("removing existing output: {}", output.display()));
        remove_output(output).map_err(|source| CloneError::RemoveOutput {
            path: output.to_path_buf(),
            source,
        })?;
    }

    let prepare = |source| CloneError::PrepareOutput {
        path: output.to_path_buf(),
        source,
    };
    // git runs with the parent as its working directory, so both ends of the
    // clone must be absolute.
    let source = fs::canonicalize(&project.path).map_err(prepare)?;
    let target = std::path::absolute(output).map_err(prepare)?;
    let parent = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| target.clone());
    fs::create_dir_all(&parent).map_err(prepare)?;

    log.debug(format!(
        "cloning '{}' to '{}'",
        project.name,
        target.display()
    ));
    driver
        .run_command(
            &parent,
            &[
                OsStr::new("clone"),
                source.as_os_str(),
                target.as_os_str(),
            ],
        )
        .map_err(CloneError::Clone)?;
    Ok(target)
}

/// Whether anything occupies `path`, including a dangling symlink.
pub(crate) fn output_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Remove whatever occupies `path`. Symlinks are removed, never followed.
fn remove_output(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::convert::tests::{TEMPLATE, test_git, unity_project};
    use crate::git::IGNORE_FILE;
    use tempfile::tempdir;

    fn converted(root: &Path, name: &str) -> Project {
        let project = unity_project(root, name);
        convert(&project, TEMPLATE, &test_git(), &Logger::capture()).unwrap();
        project
    }

    #[test]
    fn clones_into_missing_nested_output() {
        let td = tempdir().unwrap();
        let project = converted(&td.path().join("src"), "Game");
        let out = td.path().join("out").join("nested").join("Game");

        let target = clone_project(&project, &out, false, &test_git(), &Logger::capture()).unwrap();
        assert!(target.ends_with("out/nested/Game"));
        assert!(out.join(".git").is_dir());
        assert!(out.join(IGNORE_FILE).is_file());
        assert!(out.join("Assets").join("Player.cs").is_file());
    }

    #[test]
    fn refuses_non_repository() {
        let td = tempdir().unwrap();
        let project = unity_project(td.path(), "Raw");
        let out = td.path().join("out");

        let err = clone_project(&project, &out, false, &test_git(), &Logger::capture()).unwrap_err();
        assert!(matches!(err, CloneError::NotARepository(ref n) if n == "Raw"));
        assert!(!out.exists());
    }

    #[test]
    fn existing_output_without_force_is_left_alone() {
        let td = tempdir().unwrap();
        let project = converted(td.path(), "Game");
        let out = td.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("keep.txt"), "mine").unwrap();

        let err = clone_project(&project, &out, false, &test_git(), &Logger::capture()).unwrap_err();
        assert!(matches!(err, CloneError::OutputExists(_)));
        assert_eq!(fs::read_to_string(out.join("keep.txt")).unwrap(), "mine");
        assert!(!out.join(".git").exists());
    }

    #[test]
    fn force_replaces_previous_contents() {
        let td = tempdir().unwrap();
        let project = converted(td.path(), "Game");
        let out = td.path().join("out");
        fs::create_dir_all(out.join("stale")).unwrap();
        fs::write(out.join("stale").join("old.txt"), "old").unwrap();

        let log = Logger::capture();
        clone_project(&project, &out, true, &test_git(), &log).unwrap();

        assert!(!out.join("stale").exists());
        assert!(out.join(IGNORE_FILE).is_file());
        assert!(log.lines().iter().any(|l| l.starts_with("[WARN] removing existing output")));
    }

    #[test]
    fn clone_failure_surfaces_git_diagnostic() {
        let td = tempdir().unwrap();
        // Metadata directory exists but is not a usable repository.
        let project = unity_project(td.path(), "Broken");
        fs::create_dir_all(project.path.join(".git")).unwrap();

        let err = clone_project(
            &project,
            &td.path().join("out"),
            false,
            &test_git(),
            &Logger::capture(),
        )
        .unwrap_err();
        match err {
            CloneError::Clone(CommandError::Failed { diagnostic }) => {
                assert!(!diagnostic.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn force_replaces_a_plain_file() {
        let td = tempdir().unwrap();
        let project = converted(td.path(), "Game");
        let out = td.path().join("out");
        fs::write(&out, "not a directory").unwrap();

        clone_project(&project, &out, true, &test_git(), &Logger::capture()).unwrap();
        assert!(out.is_dir());
        assert!(out.join(IGNORE_FILE).is_file());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_counts_as_existing() {
        let td = tempdir().unwrap();
        let project = converted(td.path(), "Game");
        let out = td.path().join("out");
        std::os::unix::fs::symlink(td.path().join("gone"), &out).unwrap();
        assert!(output_exists(&out));

        let err = clone_project(&project, &out, false, &test_git(), &Logger::capture()).unwrap_err();
        assert!(matches!(err, CloneError::OutputExists(_)));
        assert!(fs::symlink_metadata(&out).unwrap().file_type().is_symlink());

        clone_project(&project, &out, true, &test_git(), &Logger::capture()).unwrap();
        assert!(!fs::symlink_metadata(&out).unwrap().file_type().is_symlink());
        assert!(out.join(IGNORE_FILE).is_file());
    }

    #[cfg(unix)]
    #[test]
    fn force_removes_symlink_without_touching_its_target() {
        let td = tempdir().unwrap();
        let project = converted(td.path(), "Game");
        let elsewhere = td.path().join("elsewhere");
        fs::create_dir_all(&elsewhere).unwrap();
        fs::write(elsewhere.join("keep.txt"), "keep").unwrap();
        let out = td.path().join("out");
        std::os::unix::fs::symlink(&elsewhere, &out).unwrap();

        clone_project(&project, &out, true, &test_git(), &Logger::capture()).unwrap();
        assert!(elsewhere.join("keep.txt").is_file());
        assert!(out.join(IGNORE_FILE).is_file());
    }
}
