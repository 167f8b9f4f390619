//! Error types for task runs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that end a task run
///
/// Every variant maps to an [`ErrorKind`] so callers can branch without
/// matching on messages.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The request or configuration is unusable
    #[error("invalid task configuration: {0}")]
    Configuration(String),

    /// Another run is in flight on this poller
    #[error("a task is already running on this poller")]
    AlreadyRunning,

    /// The start call returned no usable job handle
    #[error("missing task identifier")]
    MissingTaskId,

    /// The remote job reported failure
    #[error("{message}")]
    Remote {
        /// Detail supplied by the server
        message: String,
    },

    /// The run was cancelled, reset or disposed
    #[error("task cancelled")]
    Cancelled,

    /// No terminal state within the attempt budget
    #[error("Task polling timed out after {attempts} attempts")]
    TimedOut { attempts: u32 },

    /// The start call itself failed
    #[error("failed to start task: {0:#}")]
    Start(#[source] anyhow::Error),

    /// A poll call failed before returning a status
    #[error("failed to poll task: {0:#}")]
    Poll(#[source] anyhow::Error),

    /// The status callback returned an error
    #[error("status callback failed: {0:#}")]
    Status(#[source] anyhow::Error),

    /// The result payload did not decode into the expected type
    #[error("task result could not be decoded: {0}")]
    InvalidResult(#[from] serde_json::Error),
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::Configuration(_) | TaskError::AlreadyRunning => ErrorKind::Configuration,
            TaskError::MissingTaskId => ErrorKind::MissingTaskId,
            TaskError::Remote { .. } => ErrorKind::Remote,
            TaskError::Cancelled => ErrorKind::Cancelled,
            TaskError::TimedOut { .. } => ErrorKind::TimedOut,
            TaskError::Start(_) | TaskError::Poll(_) => ErrorKind::Transport,
            TaskError::Status(_) => ErrorKind::Callback,
            TaskError::InvalidResult(_) => ErrorKind::InvalidResult,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskError::TimedOut { .. })
    }
}

/// Coarse classification of a [`TaskError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    MissingTaskId,
    Remote,
    Cancelled,
    TimedOut,
    Transport,
    Callback,
    InvalidResult,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::MissingTaskId => "missing task id",
            ErrorKind::Remote => "remote failure",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::TimedOut => "timed out",
            ErrorKind::Transport => "transport",
            ErrorKind::Callback => "callback",
            ErrorKind::InvalidResult => "invalid result",
        };
        write!(f, "{}", name)
    }
}

/// The error of a finished run, as kept in the poller's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&TaskError> for RunFailure {
    fn from(error: &TaskError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_shows_server_detail() {
        let err = TaskError::Remote {
            message: "bad input".to_string(),
        };
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(err.kind(), ErrorKind::Remote);
    }

    #[test]
    fn test_transport_errors_keep_cause() {
        let err = TaskError::Poll(anyhow::anyhow!("connection reset"));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_run_failure_from_error() {
        let failure = RunFailure::from(&TaskError::TimedOut { attempts: 3 });
        assert_eq!(failure.kind, ErrorKind::TimedOut);
        assert!(failure.message.starts_with("Task polling timed out"));
    }
}
