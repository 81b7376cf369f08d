//! Explicit logging handle.
//!
//! A [`Logger`] is built once in `main` and handed by reference to every
//! component that reports progress. There is no process-wide logger: tests
//! build their own with [`Logger::capture`] and read the lines back.

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::fmt::Display;
use std::sync::{Arc, Mutex};

use crate::progress::bar_style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "[DEBUG]",
            Level::Info => "[INFO]",
            Level::Warn => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }
}

#[derive(Clone)]
enum Sink {
    Terminal,
    Captured(Arc<Mutex<Vec<String>>>),
}

#[derive(Clone)]
pub struct Logger {
    mp: MultiProgress,
    sink: Sink,
    verbose: bool,
}

impl Logger {
    /// Logger writing to stderr. Debug lines are only shown with `verbose`.
    pub fn stderr(verbose: bool) -> Self {
        Self {
            mp: MultiProgress::with_draw_target(ProgressDrawTarget::stderr()),
            sink: Sink::Terminal,
            verbose,
        }
    }

    /// Logger that keeps every line (debug included) in memory.
    pub fn capture() -> Self {
        Self {
            mp: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            sink: Sink::Captured(Arc::default()),
            verbose: true,
        }
    }

    /// Lines recorded by a [`Logger::capture`] logger, formatted as `"[LEVEL] message"`.
    pub fn lines(&self) -> Vec<String> {
        match &self.sink {
            Sink::Captured(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            Sink::Terminal => Vec::new(),
        }
    }

    pub fn debug(&self, msg: impl Display) {
        self.emit(Level::Debug, msg);
    }

    pub fn info(&self, msg: impl Display) {
        self.emit(Level::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.emit(Level::Warn, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.emit(Level::Error, msg);
    }

    /// Add a progress bar of `len` steps below the log lines.
    ///
    /// The bar is invisible when stderr is not a terminal or when capturing.
    pub fn progress(&self, len: u64) -> ProgressBar {
        let pb = self.mp.add(ProgressBar::new(len));
        pb.set_style(bar_style());
        pb
    }

    fn emit(&self, level: Level, msg: impl Display) {
        if level == Level::Debug && !self.verbose {
            return;
        }
        match &self.sink {
            Sink::Captured(lines) => {
                if let Ok(mut l) = lines.lock() {
                    l.push(format!("{} {}", level.tag(), msg));
                }
            }
            Sink::Terminal => {
                let tag = match level {
                    Level::Debug => level.tag().dimmed(),
                    Level::Info => level.tag().cyan(),
                    Level::Warn => level.tag().yellow().bold(),
                    Level::Error => level.tag().red().bold(),
                };
                let line = format!("{} {}", tag, msg);
                // println on a hidden MultiProgress is a no-op, so piped output
                // has to bypass it.
                if self.mp.is_hidden() {
                    eprintln!("{}", line);
                } else {
                    let _ = self.mp.println(line);
                }
            }
        }
    }
}
