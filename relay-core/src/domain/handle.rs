//! Job handle
//!
//! Opaque identifier of a remote job, returned by the start endpoint and
//! used to address every subsequent status poll.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Identifier of a remote job
///
/// The media API hands out either numeric or string identifiers, so both are
/// accepted. Numbers keep their JSON form, so floats and large unsigned ids
/// survive unchanged. The poller never interprets the value beyond checking
/// that it is present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobHandle {
    Number(Number),
    Text(String),
}

impl JobHandle {
    /// Returns true when the handle carries no usable identifier
    ///
    /// An empty string and the number `0` count as missing, matching how the
    /// API signals "no job was created".
    pub fn is_missing(&self) -> bool {
        match self {
            JobHandle::Number(n) => n.as_f64() == Some(0.0),
            JobHandle::Text(s) => s.is_empty(),
        }
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobHandle::Number(n) => write!(f, "{}", n),
            JobHandle::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for JobHandle {
    fn from(n: i64) -> Self {
        JobHandle::Number(Number::from(n))
    }
}

impl From<Number> for JobHandle {
    fn from(n: Number) -> Self {
        JobHandle::Number(n)
    }
}

impl From<String> for JobHandle {
    fn from(s: String) -> Self {
        JobHandle::Text(s)
    }
}

impl From<&str> for JobHandle {
    fn from(s: &str) -> Self {
        JobHandle::Text(s.to_string())
    }
}
