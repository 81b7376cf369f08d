//! Crate entry point for **gitify**.
//!
//! This library turns plain project directories (Unity projects and the
//! like) into git repositories with a project-type `.gitignore`, and clones
//! each one into a separate output tree.
//! Each submodule encapsulates one responsibility (templates, git access,
//! the conversion state machine, cloning, batch orchestration, ...).
//! The `pub use` re-exports are what `src/main.rs` builds on.

mod batch;
mod clone;
mod config;
mod convert;
mod fix;
mod git;
mod list;
mod logger;
mod progress;
mod single;
mod template;

pub use batch::{BatchError, BatchRequest, Blacklist, Outcome, Status, Summary, run as run_batch};
pub use clone::{CloneError, clone_project};
pub use config::{Config, DEFAULT_TYPE, gitify_home, load_config};
pub use convert::{Conversion, ConversionState, ConvertError, Project, classify, convert};
pub use fix::{FixError, FixOutcome, fix_projects};
pub use git::{CommandError, GitCli, IGNORE_FILE, Identity, RepoDriver};
pub use list::cmd_list;
pub use logger::Logger;
pub use single::{SingleError, SingleRequest, run_single};
pub use template::{TemplateProvider, TemplateSource};
