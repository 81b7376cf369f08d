//! `.gitignore` template lookup.
//!
//! Templates are looked up in a local cache directory first and then, unless
//! the provider is offline, in the GitHub gitignore template catalog.
//! Any failure on the remote side is reported as "not found".

mod cache;
mod github;

use std::path::PathBuf;

use crate::logger::Logger;

/// Something that can turn a project-type tag into `.gitignore` text.
pub trait TemplateSource: Sync {
    /// Template text for `tag`, or `None` when it cannot be resolved.
    fn fetch(&self, tag: &str) -> Option<String>;
}

/// Cache-then-catalog template provider.
pub struct TemplateProvider {
    cache_dir: Option<PathBuf>,
    api: String,
    allow_remote: bool,
    log: Logger,
}

impl TemplateProvider {
    pub fn new(api: impl Into<String>, log: &Logger) -> Self {
        Self {
            cache_dir: None,
            api: api.into(),
            allow_remote: true,
            log: log.clone(),
        }
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    fn fetch_remote(&self, tag: &str) -> Option<String> {
        let client = match github::gh_client() {
            Ok(c) => c,
            Err(e) => {
                self.log.debug(format!("template client unavailable: {e}"));
                return None;
            }
        };
        let tpl = match github::find_template(&client, &self.api, tag) {
            Ok(Some(t)) => t,
            Ok(None) => {
                self.log.debug(format!("no remote template named '{tag}'"));
                return None;
            }
            Err(e) => {
                self.log.debug(format!("remote template lookup failed: {e:#}"));
                return None;
            }
        };

        if let Some(dir) = &self.cache_dir {
            match cache::store(dir, &tpl.name, &tpl.source) {
                Ok(p) => self.log.debug(format!("cached template at {}", p.display())),
                Err(e) => self.log.debug(format!("could not cache template: {e:#}")),
            }
        }
        Some(tpl.source)
    }
}

impl TemplateSource for TemplateProvider {
    fn fetch(&self, tag: &str) -> Option<String> {
        if let Some(dir) = &self.cache_dir
            && let Some(text) = cache::read_cached(dir, tag)
        {
            self.log.debug(format!("using cached template for '{tag}'"));
            return Some(text);
        }
        if !self.allow_remote {
            return None;
        }
        self.fetch_remote(tag)
    }
}
