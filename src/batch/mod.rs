mod jobs;
mod outcome;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::clone::{clone_project, output_exists};
use crate::convert::{Project, convert};
use crate::git::RepoDriver;
use crate::logger::Logger;
use crate::progress::{err_style, ok_style};
use crate::template::TemplateSource;

pub use jobs::{Blacklist, build_jobs, list_projects};
pub use outcome::{Outcome, Status, Summary};

/// Inputs of one batch run.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub projects_dir: PathBuf,
    pub output_dir: PathBuf,
    pub blacklist: Blacklist,
    pub template_tag: String,
    pub workers: usize,
}

/// Failures that stop the batch before any project is dispatched.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("projects directory does not exist: {}", .0.display())]
    ProjectsDirMissing(PathBuf),
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch .gitignore for type '{0}'")]
    TemplateUnresolved(String),
    #[error("failed to read projects directory {}: {source}", path.display())]
    ReadProjects {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Read-only view shared by every worker.
struct Shared<'a> {
    output_dir: &'a Path,
    blacklist: &'a Blacklist,
    template: &'a str,
    driver: &'a dyn RepoDriver,
    log: &'a Logger,
}

/// Convert and clone every project under `req.projects_dir`.
///
/// High-level flow:
/// 1. Validate the projects directory and create the output directory.
/// 2. Resolve the `.gitignore` template once; without it nothing runs.
/// 3. List subdirectories and drop blacklisted names.
/// 4. Process the rest on a pool of `req.workers` threads. Each project is
///    converted, then cloned to `<output_dir>/<name>` unless that path
///    already exists.
///
/// Per-project failures end up in the returned [`Summary`] and never stop
/// other projects. An empty project list returns an empty summary.
///
/// # Errors
/// Only the fatal preconditions listed in [`BatchError`].
pub fn run(
    req: &BatchRequest,
    templates: &dyn TemplateSource,
    driver: &dyn RepoDriver,
    log: &Logger,
) -> Result<Summary, BatchError> {
    if !req.projects_dir.is_dir() {
        return Err(BatchError::ProjectsDirMissing(req.projects_dir.clone()));
    }
    fs::create_dir_all(&req.output_dir).map_err(|source| BatchError::CreateOutputDir {
        path: req.output_dir.clone(),
        source,
    })?;

    log.info(format!("Projects Directory: {}", req.projects_dir.display()));
    log.info(format!("Output Directory: {}", req.output_dir.display()));
    log.info(format!("Project Type: {}", req.template_tag));
    if req.blacklist.is_empty() {
        log.info("Blacklist: None");
    } else {
        log.info(format!("Blacklist: {}", req.blacklist.sorted().join(", ")));
    }
    log.info(format!("Workers: {}", req.workers));

    log.info(format!("Fetching .gitignore for type '{}'", req.template_tag));
    let template = templates
        .fetch(&req.template_tag)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BatchError::TemplateUnresolved(req.template_tag.clone()))?;
    log.info(format!("Loaded .gitignore for '{}'", req.template_tag));

    let (projects, blacklisted) =
        build_jobs(&req.projects_dir, &req.blacklist).map_err(|source| BatchError::ReadProjects {
            path: req.projects_dir.clone(),
            source,
        })?;
    for p in &blacklisted {
        log.debug(format!("'{}' is in the blacklist", p.name));
    }
    if projects.is_empty() {
        log.warn("No projects to process.");
        return Ok(Summary::default());
    }
    log.info(format!("Found {} project(s) to process", projects.len()));

    let shared = Shared {
        output_dir: &req.output_dir,
        blacklist: &req.blacklist,
        template: &template,
        driver,
        log,
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(req.workers.max(1))
        .build()?;

    let pb = log.progress(projects.len() as u64);
    let outcomes: Vec<Outcome> = pool.install(|| {
        projects
            .par_iter()
            .map(|project| {
                let outcome = process_project(project, &shared);
                pb.set_message(project.name.clone());
                pb.inc(1);
                outcome
            })
            .collect()
    });

    let summary = Summary { outcomes };
    finish_bar(&pb, &summary);
    log.info(format!("Execution Complete: {}", summary));
    Ok(summary)
}

/// Pending → blacklist check → convert → output check → clone.
fn process_project(project: &Project, shared: &Shared<'_>) -> Outcome {
    let log = shared.log;
    let name = project.name.as_str();

    // Checked again per item: callers may hand in projects that were not
    // filtered by `build_jobs`.
    if shared.blacklist.contains(name) {
        log.info(format!("[SKIP] '{}' is in the blacklist", name));
        return Outcome::new(name, Status::Skipped, Some("blacklisted".to_string()));
    }

    match convert(project, shared.template, shared.driver, log) {
        Ok(done) => log.info(format!("[DONE] '{}' → {}", name, done)),
        Err(e) => {
            log.error(format!("'{}' → {}", name, e));
            return Outcome::new(name, Status::ConvertFailed, Some(e.to_string()));
        }
    }

    let target = shared.output_dir.join(name);
    if output_exists(&target) {
        log.info(format!(
            "[SKIP] '{}' → output folder already exists: {}",
            name,
            target.display()
        ));
        return Outcome::new(
            name,
            Status::Skipped,
            Some(format!("output exists: {}", target.display())),
        );
    }

    match clone_project(project, &target, false, shared.driver, log) {
        Ok(path) => {
            log.info(format!("[DONE] cloned '{}' → '{}'", name, path.display()));
            Outcome::new(name, Status::Done, None)
        }
        Err(e) => {
            log.error(format!("'{}' → {}", name, e));
            Outcome::new(name, Status::CloneFailed, Some(e.to_string()))
        }
    }
}

fn finish_bar(pb: &ProgressBar, summary: &Summary) {
    if summary.failed() == 0 {
        pb.set_style(ok_style());
    } else {
        pb.set_style(err_style());
    }
    pb.finish_with_message(summary.to_string());
}
