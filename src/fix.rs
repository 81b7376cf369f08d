//! Sweep converted projects for uncommitted work and commit it.

use rayon::prelude::*;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

use crate::batch::{Blacklist, build_jobs};
use crate::convert::Project;
use crate::git::{CommandError, RepoDriver};
use crate::logger::Logger;

const AUTO_COMMIT_MESSAGE: &str = "Auto-commit changes";
const INDEX_LOCK: &str = "index.lock";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    NotRepository,
    Clean,
    Committed,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum FixError {
    #[error("projects directory does not exist: {}", .0.display())]
    ProjectsDirMissing(PathBuf),
    #[error("failed to read projects directory {}: {source}", path.display())]
    ReadProjects {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Commit pending changes in every non-blacklisted repository under `projects_dir`.
///
/// Returns one `(name, outcome)` pair per project. A stale `.git/index.lock`
/// left behind by an interrupted git process is removed and the commit is
/// retried once.
pub fn fix_projects(
    projects_dir: &Path,
    blacklist: &Blacklist,
    workers: usize,
    driver: &dyn RepoDriver,
    log: &Logger,
) -> Result<Vec<(String, FixOutcome)>, FixError> {
    if !projects_dir.is_dir() {
        return Err(FixError::ProjectsDirMissing(projects_dir.to_path_buf()));
    }
    let (projects, blacklisted) =
        build_jobs(projects_dir, blacklist).map_err(|source| FixError::ReadProjects {
            path: projects_dir.to_path_buf(),
            source,
        })?;
    for p in &blacklisted {
        log.info(format!("[SKIP] '{}' is in the blacklist", p.name));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;
    let results: Vec<(String, FixOutcome)> = pool.install(|| {
        projects
            .par_iter()
            .map(|p| (p.name.clone(), fix_project(p, driver, log)))
            .collect()
    });

    let count = |f: fn(&FixOutcome) -> bool| results.iter().filter(|(_, o)| f(o)).count();
    log.info(format!(
        "Fix complete: {} committed, {} clean, {} skipped, {} failed",
        count(|o| *o == FixOutcome::Committed),
        count(|o| *o == FixOutcome::Clean),
        count(|o| *o == FixOutcome::NotRepository) + blacklisted.len(),
        count(|o| matches!(o, FixOutcome::Failed(_))),
    ));
    Ok(results)
}

fn fix_project(project: &Project, driver: &dyn RepoDriver, log: &Logger) -> FixOutcome {
    let dir = project.path.as_path();
    if !driver.is_repository(dir) {
        log.info(format!("'{}' is not a git repository", project.name));
        return FixOutcome::NotRepository;
    }

    let status = match git(driver, dir, &["status", "--porcelain"]) {
        Ok(s) => s,
        Err(e) => {
            log.error(format!("'{}' → failed to read status: {}", project.name, e));
            return FixOutcome::Failed(e.to_string());
        }
    };
    if status.trim().is_empty() {
        log.debug(format!("'{}' has no uncommitted changes", project.name));
        return FixOutcome::Clean;
    }

    log.info(format!("'{}' has uncommitted changes, committing", project.name));
    let outcome = match commit_all(driver, dir) {
        Err(e) if e.to_string().contains(INDEX_LOCK) => {
            log.warn(format!("'{}' → stale index.lock, removing and retrying", project.name));
            let lock = dir.join(".git").join(INDEX_LOCK);
            match fs::remove_file(&lock) {
                Ok(()) => {
                    thread::sleep(Duration::from_secs(1));
                    commit_all(driver, dir)
                }
                Err(io) => {
                    log.error(format!("failed to remove {}: {}", lock.display(), io));
                    Err(e)
                }
            }
        }
        other => other,
    };

    match outcome {
        Ok(()) => {
            log.info(format!("[DONE] committed changes in '{}'", project.name));
            FixOutcome::Committed
        }
        Err(e) => {
            log.error(format!("'{}' → failed to commit: {}", project.name, e));
            FixOutcome::Failed(e.to_string())
        }
    }
}

fn commit_all(driver: &dyn RepoDriver, dir: &Path) -> Result<(), CommandError> {
    git(driver, dir, &["add", "."])?;
    git(driver, dir, &["commit", "-m", AUTO_COMMIT_MESSAGE])?;
    Ok(())
}

fn git(driver: &dyn RepoDriver, dir: &Path, args: &[&str]) -> Result<String, CommandError> {
    let args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
    driver.run_command(dir, &args)
}
