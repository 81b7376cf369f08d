//! Project conversion state machine.
//!
//! The state of a project is never stored. [`classify`] derives it from the
//! directory every time, and [`convert`] performs the smallest sequence of
//! git steps that takes the project to [`ConversionState::Converted`].

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::git::{CommandError, IGNORE_FILE, RepoDriver, ignore_file_on_disk};
use crate::logger::Logger;

const IGNORE_COMMIT_MESSAGE: &str = "Add .gitignore";
const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// A candidate project directory. The name is the directory base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
}

impl Project {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Unconverted,
    RepositoryOnlyNoIgnore,
    Converted,
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConversionState::Unconverted => "unconverted",
            ConversionState::RepositoryOnlyNoIgnore => "repository without .gitignore",
            ConversionState::Converted => "converted",
        })
    }
}

/// What [`convert`] did to reach the converted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    AlreadyInitialized,
    AddedIgnoreFile,
    Initialized,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Conversion::AlreadyInitialized => "already initialized",
            Conversion::AddedIgnoreFile => "added .gitignore",
            Conversion::Initialized => "git repository initialized",
        })
    }
}

/// The git step that failed during a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Init,
    AddIgnoreFile,
    CommitIgnoreFile,
    AddFiles,
    CommitFiles,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Init => "initialize git",
            Step::AddIgnoreFile => "add .gitignore",
            Step::CommitIgnoreFile => "commit .gitignore",
            Step::AddFiles => "add files",
            Step::CommitFiles => "commit files",
        })
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("gitignore content is empty")]
    EmptyTemplate,
    #[error("failed to write {}: {source}", path.display())]
    WriteIgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to {step}: {source}")]
    Step {
        step: Step,
        #[source]
        source: CommandError,
    },
}

/// Derive the conversion state of `dir` from what is on disk right now.
pub fn classify(dir: &Path, driver: &dyn RepoDriver) -> ConversionState {
    if !driver.is_repository(dir) {
        ConversionState::Unconverted
    } else if driver.has_ignore_file(dir) {
        ConversionState::Converted
    } else {
        ConversionState::RepositoryOnlyNoIgnore
    }
}

/// Drive `project` to the converted state using `template` as `.gitignore`.
///
/// - Converted: no-op.
/// - Repository without a committed ignore file: write, add and commit it.
/// - Not a repository: `git init`, commit the ignore file, then commit
///   everything else as "Initial commit".
///
/// Steps run strictly in order and the first failure aborts. Nothing that
/// already succeeded is rolled back; the next run re-classifies and resumes.
///
/// # Errors
/// - [`ConvertError::EmptyTemplate`] before touching the directory.
/// - [`ConvertError::WriteIgnoreFile`] / [`ConvertError::Step`] for the
///   first step that failed, carrying git's own diagnostic.
pub fn convert(
    project: &Project,
    template: &str,
    driver: &dyn RepoDriver,
    log: &Logger,
) -> Result<Conversion, ConvertError> {
    if template.is_empty() {
        return Err(ConvertError::EmptyTemplate);
    }
    let dir = project.path.as_path();

    match classify(dir, driver) {
        ConversionState::Converted => {
            log.debug(format!(
                "'{}' is already a git repository with .gitignore",
                project.name
            ));
            Ok(Conversion::AlreadyInitialized)
        }
        ConversionState::RepositoryOnlyNoIgnore => {
            log.debug(format!(
                "adding .gitignore to existing git repository '{}'",
                project.name
            ));
            if ignore_file_on_disk(dir) {
                log.warn(format!(
                    "'{}' has an uncommitted .gitignore; replacing it with the template",
                    project.name
                ));
            }
            commit_ignore_file(dir, template, driver)?;
            Ok(Conversion::AddedIgnoreFile)
        }
        ConversionState::Unconverted => {
            log.debug(format!("initializing git repository '{}'", project.name));
            git(driver, dir, Step::Init, &["init"])?;
            commit_ignore_file(dir, template, driver)?;

            log.debug(format!("committing project files '{}'", project.name));
            git(driver, dir, Step::AddFiles, &["add", "."])?;
            git(
                driver,
                dir,
                Step::CommitFiles,
                &["commit", "-m", INITIAL_COMMIT_MESSAGE],
            )?;
            Ok(Conversion::Initialized)
        }
    }
}

fn commit_ignore_file(dir: &Path, template: &str, driver: &dyn RepoDriver) -> Result<(), ConvertError> {
    let path = dir.join(IGNORE_FILE);
    fs::write(&path, template).map_err(|source| ConvertError::WriteIgnoreFile { path, source })?;
    git(driver, dir, Step::AddIgnoreFile, &["add", IGNORE_FILE])?;
    git(
        driver,
        dir,
        Step::CommitIgnoreFile,
        &["commit", "-m", IGNORE_COMMIT_MESSAGE],
    )?;
    Ok(())
}

fn git(driver: &dyn RepoDriver, dir: &Path, step: Step, args: &[&str]) -> Result<(), ConvertError> {
    let args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
    driver
        .run_command(dir, &args)
        .map(|_| ())
        .map_err(|source| ConvertError::Step { step, source })
}
