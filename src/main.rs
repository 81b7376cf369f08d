//! # gitify
//!
//! **gitify** converts unmanaged project directories into git repositories
//! and clones them into a separate output tree.
//!
//! Features:
//! - `gitify batch` converts and clones every project under a directory in parallel
//! - `gitify single` converts and clones exactly one project
//! - `gitify fix` commits uncommitted changes in already-converted projects
//! - `gitify list` shows every project and its conversion state
//! - `gitify home` prints the gitify config directory
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gitify::{
    BatchRequest, Blacklist, Config, GitCli, Logger, SingleRequest, TemplateProvider, cmd_list,
    fix_projects, gitify_home, load_config, run_batch, run_single,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line interface definition.
#[derive(Parser, Debug)]
#[command(
    name = "gitify",
    version,
    about = "gitify - turn project folders into git repositories and clone them",
    arg_required_else_help = true
)]
struct Cli {
    /// Print debug lines
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: $(gitify home)/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Options shared by the commands that need a `.gitignore` template.
#[derive(Args, Debug)]
struct TemplateArgs {
    /// Project type used to pick the .gitignore template (default: Unity)
    #[arg(long = "type")]
    project_type: Option<String>,

    /// Directory of cached `<Type>.gitignore` files
    #[arg(long = "template_cache", alias = "template-cache")]
    template_cache: Option<PathBuf>,

    /// Never contact the remote template catalog
    #[arg(long)]
    offline: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Convert and clone every project in a directory
    Batch {
        /// Input directory where all the projects reside
        #[arg(long = "projects_dir", alias = "projects-dir")]
        projects_dir: PathBuf,
        /// Output directory for the clones (created if missing)
        #[arg(long = "output_dir", alias = "output-dir")]
        output_dir: PathBuf,
        /// Comma-separated project names to exclude
        #[arg(long, default_value = "")]
        blacklist: String,
        /// Number of worker threads (default: CPU count)
        #[arg(long)]
        workers: Option<usize>,
        #[command(flatten)]
        template: TemplateArgs,
    },
    /// Convert and clone a single project
    Single {
        /// Project directory to convert
        #[arg(long = "project_path", alias = "project-path")]
        project_path: PathBuf,
        /// Where the clone is written
        #[arg(long = "output_path", alias = "output-path")]
        output_path: PathBuf,
        /// Remove an existing output directory before cloning
        #[arg(long)]
        force: bool,
        #[command(flatten)]
        template: TemplateArgs,
    },
    /// Commit uncommitted changes in converted projects
    Fix {
        #[arg(long = "projects_dir", alias = "projects-dir")]
        projects_dir: PathBuf,
        #[arg(long, default_value = "")]
        blacklist: String,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// List projects with their conversion state
    List {
        #[arg(long = "projects_dir", alias = "projects-dir")]
        projects_dir: PathBuf,
        #[arg(long, default_value = "")]
        blacklist: String,
    },
    /// Print the gitify config directory
    Home,
}

/// CLI entry point.
///
/// Fatal errors are logged once and turned into exit code 1.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let log = Logger::stderr(cli.verbose);
    match dispatch(cli, &log) {
        Ok(code) => code,
        Err(e) => {
            log.error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli, log: &Logger) -> Result<ExitCode> {
    let cfg = load_config(cli.config.as_deref())?;
    let driver = match cfg.identity() {
        Some(id) => GitCli::with_identity(id),
        None => GitCli::new(),
    };

    match cli.cmd {
        Cmd::Batch {
            projects_dir,
            output_dir,
            blacklist,
            workers,
            template,
        } => {
            let req = BatchRequest {
                projects_dir,
                output_dir,
                blacklist: merged_blacklist(&cfg, &blacklist),
                template_tag: cfg.project_type(template.project_type.as_deref()),
                workers: cfg.workers(workers),
            };
            let provider = provider(&cfg, &template, log);
            run_batch(&req, &provider, &driver, log)?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Single {
            project_path,
            output_path,
            force,
            template,
        } => {
            let req = SingleRequest {
                project_path,
                output_path,
                force,
                template_tag: cfg.project_type(template.project_type.as_deref()),
            };
            let provider = provider(&cfg, &template, log);
            run_single(&req, &provider, &driver, log)?;
            log.info("[SUCCESS] Project conversion and cloning completed successfully!");
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Fix {
            projects_dir,
            blacklist,
            workers,
        } => {
            let bl = merged_blacklist(&cfg, &blacklist);
            fix_projects(&projects_dir, &bl, cfg.workers(workers), &driver, log)?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::List {
            projects_dir,
            blacklist,
        } => {
            cmd_list(&projects_dir, &merged_blacklist(&cfg, &blacklist), &driver)?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Home => {
            println!("{}", gitify_home().display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn merged_blacklist(cfg: &Config, csv: &str) -> Blacklist {
    let mut bl = Blacklist::parse(csv);
    bl.extend(&cfg.blacklist);
    bl
}

fn provider(cfg: &Config, args: &TemplateArgs, log: &Logger) -> TemplateProvider {
    TemplateProvider::new(cfg.template_api(), log)
        .cache_dir(cfg.template_cache(args.template_cache.as_deref()))
        .allow_remote(!(args.offline || cfg.offline))
}
