//! Poller lifecycle

use serde::{Deserialize, Serialize};

/// Lifecycle of a task poller
///
/// `Idle` is the initial state and the state after a reset. `Processing`
/// spans the start call and every polling attempt. `Success` and `Failure`
/// are terminal until the next run or reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Failure,
}

impl PollerStatus {
    /// Returns true for `Success` and `Failure`
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollerStatus::Success | PollerStatus::Failure)
    }
}

impl std::fmt::Display for PollerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollerStatus::Idle => write!(f, "idle"),
            PollerStatus::Processing => write!(f, "processing"),
            PollerStatus::Success => write!(f, "success"),
            PollerStatus::Failure => write!(f, "failure"),
        }
    }
}
