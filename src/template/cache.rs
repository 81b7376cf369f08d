use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const SUFFIX: &str = ".gitignore";

/// Find `{tag}.gitignore` in `dir`, comparing file names ASCII case-insensitively.
///
/// A missing or unreadable directory is a miss, not an error.
pub fn find_cached(dir: &Path, tag: &str) -> Option<PathBuf> {
    let want = format!("{}{}", tag, SUFFIX);
    fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|s| s.to_str())
                    .map(|s| s.eq_ignore_ascii_case(&want))
                    .unwrap_or(false)
        })
}

/// Read the cached template for `tag`, if any.
pub fn read_cached(dir: &Path, tag: &str) -> Option<String> {
    find_cached(dir, tag).and_then(|p| fs::read_to_string(p).ok())
}

/// Store `content` as `<dir>/<name>.gitignore`.
///
/// The file is written to a temporary sibling and renamed into place so a
/// concurrent reader never sees a partial template.
pub fn store(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dst = dir.join(format!("{}{}", name, SUFFIX));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(&dst)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn lookup_ignores_case() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("Unity.gitignore"), "Library/\n").unwrap();

        assert_eq!(read_cached(td.path(), "unity").as_deref(), Some("Library/\n"));
        assert_eq!(read_cached(td.path(), "UNITY").as_deref(), Some("Library/\n"));
        assert!(read_cached(td.path(), "Godot").is_none());
    }

    #[test]
    fn missing_directory_is_a_miss() {
        let td = tempdir().unwrap();
        assert!(find_cached(&td.path().join("nope"), "Unity").is_none());
    }

    #[test]
    fn directories_are_not_templates() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("Unity.gitignore")).unwrap();
        assert!(find_cached(td.path(), "Unity").is_none());
    }

    #[test]
    fn store_creates_directory_and_overwrites() {
        let td = tempdir().unwrap();
        let dir = td.path().join("templates");
        store(&dir, "Unity", "old").unwrap();
        let p = store(&dir, "Unity", "new").unwrap();

        assert_eq!(p, dir.join("Unity.gitignore"));
        assert_eq!(fs::read_to_string(p).unwrap(), "new");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    }
}
