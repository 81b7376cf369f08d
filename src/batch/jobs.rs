use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::convert::Project;

/// Project names excluded from all processing.
///
/// Entries are trimmed when added; lookups compare the project name
/// exactly against the trimmed entries.
#[derive(Debug, Clone, Default)]
pub struct Blacklist(HashSet<String>);

impl Blacklist {
    /// Parse a comma-separated list such as `"Old, Sandbox ,Tmp"`.
    pub fn parse(csv: &str) -> Self {
        csv.split(',').collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for n in names {
            let n = n.as_ref().trim();
            if !n.is_empty() {
                self.0.insert(n.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in sorted order, for display.
    pub fn sorted(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.0.iter().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}

impl<S: AsRef<str>> FromIterator<S> for Blacklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut b = Blacklist::default();
        b.extend(iter);
        b
    }
}

/// Immediate subdirectories of `dir`, sorted by name.
///
/// Plain files are ignored. Symlinks to directories count as projects.
pub fn list_projects(dir: &Path) -> io::Result<Vec<Project>> {
    let mut projects = Vec::new();
    for ent in fs::read_dir(dir)? {
        let path = ent?.path();
        if path.is_dir() {
            projects.push(Project::new(path));
        }
    }
    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

/// Split the projects in `dir` into those to process and those blacklisted.
pub fn build_jobs(dir: &Path, blacklist: &Blacklist) -> io::Result<(Vec<Project>, Vec<Project>)> {
    Ok(list_projects(dir)?
        .into_iter()
        .partition(|p| !blacklist.contains(&p.name)))
}
