use git2::Repository;
use std::path::Path;

use super::IGNORE_FILE;

/// Whether `dir` itself carries repository metadata.
///
/// Only `<dir>/.git` counts; a directory nested inside some other
/// repository is still unconverted.
pub fn is_repository(dir: &Path) -> bool {
    dir.join(".git").is_dir()
}

/// Whether an ignore file exists in the working tree, committed or not.
pub fn ignore_file_on_disk(dir: &Path) -> bool {
    dir.join(IGNORE_FILE).is_file()
}

/// Whether the ignore file is part of the tree at `HEAD`.
///
/// Returns `false` when `dir` is not a repository, when `HEAD` is unborn
/// (no commit yet), or when the file is only present on disk.
pub fn ignore_file_committed(dir: &Path) -> bool {
    if !is_repository(dir) {
        return false;
    }
    let repo = match Repository::open(dir) {
        Ok(r) => r,
        Err(_) => return false,
    };
    // An unborn branch surfaces as an error here as well.
    let Ok(head) = repo.head() else {
        return false;
    };
    head.peel_to_tree()
        .map(|tree| tree.get_name(IGNORE_FILE).is_some())
        .unwrap_or(false)
}
