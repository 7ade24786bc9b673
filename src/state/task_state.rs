/// Crawl task state definitions
///
/// Each task moves `Pending → Fetching → {Accepted, Rejected, Failed}`, or
/// straight from `Pending` to `Rejected` when it is filtered before any
/// request is made.
use std::fmt;
use thiserror::Error;

/// Represents the current state of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Task is in the frontier
    Pending,

    /// Task's page is being fetched
    Fetching,

    /// Page became a document
    Accepted,

    /// Page was filtered (visited, too deep, robots, status, content)
    Rejected,

    /// Page could not be fetched (timeout, connection failure)
    Failed,
}

impl TaskState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Failed)
    }

    /// Returns true if the state machine permits moving to `next`
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Pending, Self::Rejected)
                | (Self::Fetching, Self::Accepted)
                | (Self::Fetching, Self::Rejected)
                | (Self::Fetching, Self::Failed)
        )
    }

    /// Short lowercase label used in logs and run records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single crawl task did not produce a document
///
/// These never abort a crawl run; the engine logs them and moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported content type '{content_type}' at {url}")]
    UnsupportedContent { url: String, content_type: String },

    #[error("Content too short at {url}: {words} words")]
    ContentTooShort { url: String, words: usize },

    #[error("Duplicate content at {url}")]
    DuplicateContent { url: String },

    #[error("URL disallowed by robots.txt: {url}")]
    RobotsDisallowed { url: String },
}

impl TaskError {
    /// The terminal state a task ends in for this error
    pub fn state(&self) -> TaskState {
        match self {
            Self::Network { .. } => TaskState::Failed,
            _ => TaskState::Rejected,
        }
    }

    /// The URL of the task that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::UnsupportedContent { url, .. }
            | Self::ContentTooShort { url, .. }
            | Self::DuplicateContent { url }
            | Self::RobotsDisallowed { url } => url,
        }
    }
}
