//! Git integration layer.
//!
//! Mutations (init, add, commit, clone, status) go through the `git`
//! executable via [`GitCli`]. Read-only inspection of the committed tree is
//! done in-process with the `git2` crate (see `git2_backend`).
//!
//! The rest of the crate only talks to the [`RepoDriver`] trait so tests can
//! wrap or replace the real driver.

mod cli_backend;
mod git2_backend;

use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

pub use cli_backend::{GitCli, Identity};
pub use git2_backend::ignore_file_on_disk;

/// Name of the ignore file managed by this tool.
pub const IGNORE_FILE: &str = ".gitignore";

/// Failure of a single version-control invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The tool could not be started at all (missing binary, bad cwd, ...).
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    /// The tool ran and exited non-zero. `diagnostic` is its output, unmodified.
    #[error("{diagnostic}")]
    Failed { diagnostic: String },
}

/// Atomic version-control primitives over a working directory.
///
/// Each call is independent; nothing is cached between calls, so the
/// answers always reflect the current state on disk.
pub trait RepoDriver: Sync {
    /// The directory holds repository metadata (`.git/`).
    fn is_repository(&self, dir: &Path) -> bool;

    /// The directory has an ignore file recorded in the commit at `HEAD`.
    fn has_ignore_file(&self, dir: &Path) -> bool;

    /// Run the version-control tool with `dir` as its working directory.
    ///
    /// Returns stdout on success.
    fn run_command(&self, dir: &Path, args: &[&OsStr]) -> Result<String, CommandError>;
}
