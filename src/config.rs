use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::git::Identity;

pub const DEFAULT_TYPE: &str = "Unity";
pub const DEFAULT_TEMPLATE_API: &str = "https://api.github.com";

/// `$XDG_CONFIG_HOME/gitify`, falling back to `~/.config/gitify`.
pub fn gitify_home() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env::var_os("HOME").unwrap_or_default()).join(".config"))
        .join("gitify")
}

/// Top-level configuration structure loaded from `config.toml`.
///
/// Every key is optional; command-line flags take precedence over
/// whatever is set here.
///
/// Example TOML:
/// ```toml
/// type = "Unity"
/// workers = 8
/// blacklist = ["Sandbox", "Old Prototype"]
/// template_cache = "/home/me/.config/gitify/templates"
///
/// [git]
/// user_name = "Build Bot"
/// user_email = "bot@example.com"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub blacklist: Vec<String>,
    #[serde(default)]
    pub template_cache: Option<PathBuf>,
    #[serde(default)]
    pub template_api: Option<String>,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub git: GitConfig,
}

/// Commit identity used when the machine running the batch has none configured.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GitConfig {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl Config {
    /// Project-type tag, falling back to [`DEFAULT_TYPE`].
    pub fn project_type(&self, flag: Option<&str>) -> String {
        flag.or(self.r#type.as_deref())
            .unwrap_or(DEFAULT_TYPE)
            .to_string()
    }

    /// Worker count: flag, then config, then available parallelism. Never zero.
    pub fn workers(&self, flag: Option<usize>) -> usize {
        flag.or(self.workers).unwrap_or_else(num_cpus::get).max(1)
    }

    /// Local template cache directory, defaulting to `$(gitify home)/templates`.
    pub fn template_cache(&self, flag: Option<&Path>) -> PathBuf {
        match flag.or(self.template_cache.as_deref()) {
            Some(p) => p.to_path_buf(),
            None => gitify_home().join("templates"),
        }
    }

    pub fn template_api(&self) -> &str {
        self.template_api.as_deref().unwrap_or(DEFAULT_TEMPLATE_API)
    }

    /// Identity to pass to `git commit`, only when both halves are configured.
    pub fn identity(&self) -> Option<Identity> {
        match (&self.git.user_name, &self.git.user_email) {
            (Some(name), Some(email)) => Some(Identity {
                name: name.clone(),
                email: email.clone(),
            }),
            _ => None,
        }
    }
}

/// Load and parse `config.toml`.
///
/// - With `explicit` set, the file must exist.
/// - Otherwise the default location is used and a missing file yields
///   [`Config::default`].
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is malformed.
/// The message always includes the resolved path.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = gitify_home().join("config.toml");
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<Config> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("config not found: {}", path.display()))?;
    let cfg: Config = toml::from_str(&txt)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_full_config() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.toml");
        fs::write(
            &p,
            r#"
type = "Godot"
workers = 3
blacklist = ["Sandbox", " Old "]
template_cache = "/tmp/templates"
template_api = "http://localhost:1234"
offline = true

[git]
user_name = "Bot"
user_email = "bot@example.com"
"#,
        )
        .unwrap();

        let cfg = load_config(Some(&p)).unwrap();
        assert_eq!(cfg.project_type(None), "Godot");
        assert_eq!(cfg.workers(None), 3);
        assert_eq!(cfg.blacklist, vec!["Sandbox", " Old "]);
        assert_eq!(
            cfg.template_cache(None),
            PathBuf::from("/tmp/templates")
        );
        assert_eq!(cfg.template_api(), "http://localhost:1234");
        assert!(cfg.offline);
        let id = cfg.identity().unwrap();
        assert_eq!(id.name, "Bot");
        assert_eq!(id.email, "bot@example.com");
    }

    #[test]
    fn flags_take_precedence() {
        let cfg = Config {
            r#type: Some("Godot".into()),
            workers: Some(2),
            ..Config::default()
        };
        assert_eq!(cfg.project_type(Some("Python")), "Python");
        assert_eq!(cfg.workers(Some(7)), 7);
        assert_eq!(cfg.workers(Some(0)), 1);
    }

    #[test]
    fn defaults_when_empty() {
        let cfg = Config::default();
        assert_eq!(cfg.project_type(None), DEFAULT_TYPE);
        assert_eq!(cfg.template_api(), DEFAULT_TEMPLATE_API);
        assert!(cfg.workers(None) >= 1);
        assert!(cfg.identity().is_none());
        assert_eq!(cfg.template_cache(None), gitify_home().join("templates"));
        assert!(gitify_home().ends_with("gitify"));
    }

    #[test]
    fn template_cache_flag_beats_config() {
        let cfg = Config {
            template_cache: Some("/from/config".into()),
            ..Config::default()
        };
        assert_eq!(
            cfg.template_cache(Some(Path::new("/from/flag"))),
            PathBuf::from("/from/flag")
        );
        assert_eq!(cfg.template_cache(None), PathBuf::from("/from/config"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let td = tempdir().unwrap();
        let err = load_config(Some(&td.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config not found"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.toml");
        fs::write(&p, "workers = \"many\"").unwrap();
        assert!(load_config(Some(&p)).is_err());
    }
}
