use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::batch::{Blacklist, list_projects};
use crate::convert::classify;
use crate::git::RepoDriver;

/// One line per project under `projects_dir`, with its conversion state.
///
/// Example output:
/// ```text
/// - Bowling Scene [blacklisted]
/// - CharDemo [converted]
/// - IKPlayground [unconverted]
/// - VRMirror [repository without .gitignore]
/// ```
pub fn project_lines(
    projects_dir: &Path,
    blacklist: &Blacklist,
    driver: &dyn RepoDriver,
) -> Result<Vec<String>> {
    if !projects_dir.is_dir() {
        bail!("projects directory does not exist: {}", projects_dir.display());
    }
    let projects = list_projects(projects_dir)
        .with_context(|| format!("failed to read {}", projects_dir.display()))?;
    Ok(projects
        .iter()
        .map(|p| {
            if blacklist.contains(&p.name) {
                format!("- {} [blacklisted]", p.name)
            } else {
                format!("- {} [{}]", p.name, classify(&p.path, driver))
            }
        })
        .collect())
}

/// CLI command: print the projects under `projects_dir` and their state.
///
/// # Errors
/// Returns an error if `projects_dir` is missing or cannot be read.
pub fn cmd_list(projects_dir: &Path, blacklist: &Blacklist, driver: &dyn RepoDriver) -> Result<()> {
    for line in project_lines(projects_dir, blacklist, driver)? {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::convert::tests::{TEMPLATE, test_git, unity_project};
    use crate::logger::Logger;
    use std::ffi::OsStr;
    use tempfile::tempdir;

    #[test]
    fn shows_every_state() {
        let td = tempdir().unwrap();
        let done = unity_project(td.path(), "Done");
        convert(&done, TEMPLATE, &test_git(), &Logger::capture()).unwrap();
        let half = unity_project(td.path(), "Half");
        test_git().run_command(&half.path, &[OsStr::new("init")]).unwrap();
        unity_project(td.path(), "Raw");
        unity_project(td.path(), "Skip");

        let lines = project_lines(td.path(), &Blacklist::parse("Skip"), &test_git()).unwrap();
        assert_eq!(
            lines,
            vec![
                "- Done [converted]",
                "- Half [repository without .gitignore]",
                "- Raw [unconverted]",
                "- Skip [blacklisted]",
            ]
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let td = tempdir().unwrap();
        assert!(project_lines(&td.path().join("nope"), &Blacklist::default(), &test_git()).is_err());
    }
}
