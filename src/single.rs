use std::path::PathBuf;
use thiserror::Error;

use crate::clone::{CloneError, clone_project};
use crate::convert::{ConvertError, Project, convert};
use crate::git::RepoDriver;
use crate::logger::Logger;
use crate::template::TemplateSource;

/// Inputs of a single-project run.
#[derive(Debug, Clone)]
pub struct SingleRequest {
    pub project_path: PathBuf,
    pub output_path: PathBuf,
    pub force: bool,
    pub template_tag: String,
}

#[derive(Debug, Error)]
pub enum SingleError {
    #[error("project directory does not exist: {}", .0.display())]
    ProjectMissing(PathBuf),
    #[error("failed to fetch .gitignore for type '{0}'")]
    TemplateUnresolved(String),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Clone(#[from] CloneError),
}

/// Convert one project, then clone it to `req.output_path`.
///
/// Unlike batch mode an existing output is replaced when `req.force` is set.
///
/// # Errors
/// The first failing stage; conversion errors stop before any clone.
pub fn run_single(
    req: &SingleRequest,
    templates: &dyn TemplateSource,
    driver: &dyn RepoDriver,
    log: &Logger,
) -> Result<PathBuf, SingleError> {
    if !req.project_path.is_dir() {
        return Err(SingleError::ProjectMissing(req.project_path.clone()));
    }
    let project = Project::new(
        std::fs::canonicalize(&req.project_path).unwrap_or_else(|_| req.project_path.clone()),
    );

    log.info(format!("Project Path: {}", project.path.display()));
    log.info(format!("Output Path: {}", req.output_path.display()));
    log.info(format!("Force Mode: {}", if req.force { "ON" } else { "OFF" }));

    let template = templates
        .fetch(&req.template_tag)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SingleError::TemplateUnresolved(req.template_tag.clone()))?;

    log.info("[STEP 1] Initializing git repository and setting up .gitignore");
    let done = convert(&project, &template, driver, log)?;
    log.info(format!("'{}' → {}", project.name, done));

    log.info("[STEP 2] Cloning project to output path");
    let target = clone_project(&project, &req.output_path, req.force, driver, log)?;
    log.info(format!("Cloned to '{}'", target.display()));
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tests::{Recording, TEMPLATE, test_git, unity_project};
    use crate::git::IGNORE_FILE;
    use std::fs;
    use tempfile::tempdir;

    struct Unity;

    impl TemplateSource for Unity {
        fn fetch(&self, tag: &str) -> Option<String> {
            tag.eq_ignore_ascii_case("unity").then(|| TEMPLATE.to_string())
        }
    }

    fn request(project: PathBuf, output: PathBuf, force: bool) -> SingleRequest {
        SingleRequest {
            project_path: project,
            output_path: output,
            force,
            template_tag: "Unity".into(),
        }
    }

    #[test]
    fn converts_and_clones() {
        let td = tempdir().unwrap();
        let project = unity_project(td.path(), "Game");
        let out = td.path().join("export").join("Game");

        run_single(&request(project.path.clone(), out.clone(), false), &Unity, &test_git(), &Logger::capture())
            .unwrap();
        assert!(project.path.join(".git").is_dir());
        assert!(out.join(IGNORE_FILE).is_file());
    }

    #[test]
    fn existing_output_needs_force() {
        let td = tempdir().unwrap();
        let project = unity_project(td.path(), "Game");
        let out = td.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("old.txt"), "old").unwrap();

        let err = run_single(&request(project.path.clone(), out.clone(), false), &Unity, &test_git(), &Logger::capture())
            .unwrap_err();
        assert!(matches!(err, SingleError::Clone(CloneError::OutputExists(_))));
        assert!(out.join("old.txt").exists());

        run_single(&request(project.path.clone(), out.clone(), true), &Unity, &test_git(), &Logger::capture())
            .unwrap();
        assert!(!out.join("old.txt").exists());
        assert!(out.join(IGNORE_FILE).is_file());
    }

    #[test]
    fn missing_project_is_rejected() {
        let td = tempdir().unwrap();
        let driver = Recording::new();
        let err = run_single(
            &request(td.path().join("nope"), td.path().join("out"), false),
            &Unity,
            &driver,
            &Logger::capture(),
        )
        .unwrap_err();
        assert!(matches!(err, SingleError::ProjectMissing(_)));
        assert!(driver.calls().is_empty());
        assert!(!td.path().join("out").exists());
    }

    #[test]
    fn unknown_type_is_fatal() {
        let td = tempdir().unwrap();
        let project = unity_project(td.path(), "Game");
        let mut req = request(project.path.clone(), td.path().join("out"), false);
        req.template_tag = "Cobol".into();

        let err = run_single(&req, &Unity, &test_git(), &Logger::capture()).unwrap_err();
        assert!(matches!(err, SingleError::TemplateUnresolved(_)));
        assert!(!project.path.join(".git").exists());
    }
}
