use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use super::{CommandError, RepoDriver, git2_backend};

/// Commit author/committer passed as `-c user.name=… -c user.email=…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// [`RepoDriver`] backed by the `git` executable found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    identity: Option<Identity>,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `identity` for every commit instead of the user's git config.
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }
}

impl RepoDriver for GitCli {
    fn is_repository(&self, dir: &Path) -> bool {
        git2_backend::is_repository(dir)
    }

    fn has_ignore_file(&self, dir: &Path) -> bool {
        git2_backend::ignore_file_committed(dir)
    }

    fn run_command(&self, dir: &Path, args: &[&OsStr]) -> Result<String, CommandError> {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(dir);
        if let Some(id) = &self.identity {
            cmd.arg("-c")
                .arg(format!("user.name={}", id.name))
                .arg("-c")
                .arg(format!("user.email={}", id.email));
        }
        let output = cmd.args(args).output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostic = [stderr.trim(), stdout.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        let diagnostic = if diagnostic.is_empty() {
            format!("git exited with {}", output.status)
        } else {
            diagnostic
        };
        Err(CommandError::Failed { diagnostic })
    }
}
