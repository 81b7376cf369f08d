use std::fmt;

/// Terminal state of one project in a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Done,
    Skipped,
    ConvertFailed,
    CloneFailed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Done => "done",
            Status::Skipped => "skipped",
            Status::ConvertFailed => "convert failed",
            Status::CloneFailed => "clone failed",
        })
    }
}

/// Result record for one project. Built once by the worker, never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub project: String,
    pub status: Status,
    pub message: Option<String>,
}

impl Outcome {
    pub fn new(project: &str, status: Status, message: Option<String>) -> Self {
        Self {
            project: project.to_string(),
            status,
            message,
        }
    }

    pub fn success(&self) -> bool {
        self.status == Status::Done
    }
}

/// Aggregate of a batch run. Only counts are derived from the outcomes,
/// so their order does not matter.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(Status::Done)
    }

    pub fn skipped(&self) -> usize {
        self.count(Status::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(Status::ConvertFailed) + self.count(Status::CloneFailed)
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, project: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.project == project)
    }

    fn count(&self, status: Status) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} projects processed successfully",
            self.succeeded(),
            self.total()
        )
    }
}
