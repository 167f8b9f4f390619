//! Task DTOs for the start and status endpoints

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::handle::JobHandle;

/// Fallback error detail when a failed poll carries none
pub const GENERIC_FAILURE: &str = "Task failed";

/// Response of a start endpoint
///
/// Either a bare handle, or an object carrying it under `taskId` or `id`.
/// Arrays and other shapes land in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StartResponse {
    Bare(JobHandle),
    Object {
        #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
        task_id: Option<JobHandle>,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<JobHandle>,
    },
    /// Anything else the endpoint returned; carries no handle
    Other(Value),
}

impl StartResponse {
    /// Resolves the job handle
    ///
    /// `taskId` wins over `id`. Missing handles (empty string, `0`) are
    /// skipped, so `{ "taskId": "", "id": 5 }` resolves to `5`.
    pub fn handle(&self) -> Option<JobHandle> {
        match self {
            StartResponse::Bare(handle) => Some(handle).filter(|h| !h.is_missing()).cloned(),
            StartResponse::Object { task_id, id } => task_id
                .iter()
                .chain(id.iter())
                .find(|h| !h.is_missing())
                .cloned(),
            StartResponse::Other(_) => None,
        }
    }
}

impl From<Value> for StartResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::String(_) | Value::Number(_) => match JobHandle::deserialize(&value) {
                Ok(handle) => StartResponse::Bare(handle),
                Err(_) => StartResponse::Other(value),
            },
            Value::Object(map) => {
                let field = |key: &str| map.get(key).and_then(|v| JobHandle::deserialize(v).ok());
                StartResponse::Object {
                    task_id: field("taskId").or_else(|| field("task_id")),
                    id: field("id"),
                }
            }
            other => StartResponse::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for StartResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(StartResponse::from)
    }
}

impl From<JobHandle> for StartResponse {
    fn from(handle: JobHandle) -> Self {
        StartResponse::Bare(handle)
    }
}

/// One status snapshot of a remote job
///
/// The API reports the status token under `state` or `status`; `state` wins
/// when both are present. Fields the poller does not know about are kept in
/// `extra` so custom success/failure predicates can look at them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PollResult {
    /// Creates a poll result carrying only a `state` token
    pub fn with_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Default::default()
        }
    }

    /// Attaches a result payload
    pub fn and_result(mut self, result: impl Into<Value>) -> Self {
        self.result = Some(result.into());
        self
    }

    /// Attaches an error detail
    pub fn and_error(mut self, error: impl Into<Value>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// The status token: `state`, falling back to `status`
    pub fn token(&self) -> Option<&str> {
        self.state.as_deref().or(self.status.as_deref())
    }

    /// Returns true when the result payload is present and truthy
    pub fn has_payload(&self) -> bool {
        self.result.as_ref().is_some_and(is_truthy)
    }

    /// Human readable failure detail
    ///
    /// Uses `error` (a string as-is, an object's `message`, otherwise its JSON
    /// text), then `status`, then [`GENERIC_FAILURE`].
    pub fn error_detail(&self) -> String {
        if let Some(error) = self.error.as_ref().filter(|e| is_truthy(e)) {
            return match error {
                Value::String(s) => s.clone(),
                Value::Object(map) => match map.get("message") {
                    Some(Value::String(message)) if !message.is_empty() => message.clone(),
                    _ => error.to_string(),
                },
                other => other.to_string(),
            };
        }

        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Loose truthiness used by the media API
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy; arrays and objects are
/// always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn start(value: Value) -> StartResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_start_response_shapes() {
        assert_eq!(start(json!("abc")).handle(), Some(JobHandle::from("abc")));
        assert_eq!(start(json!(9)).handle(), Some(JobHandle::from(9)));
        assert_eq!(
            start(json!({ "taskId": "t-1", "id": "ignored" })).handle(),
            Some(JobHandle::from("t-1"))
        );
        assert_eq!(
            start(json!({ "task_id": 3 })).handle(),
            Some(JobHandle::from(3))
        );
        assert_eq!(
            start(json!({ "id": 11, "queued": true })).handle(),
            Some(JobHandle::from(11))
        );
    }

    #[test]
    fn test_start_response_without_handle() {
        assert_eq!(start(json!("")).handle(), None);
        assert_eq!(start(json!(0)).handle(), None);
        assert_eq!(start(json!(null)).handle(), None);
        assert_eq!(start(json!(true)).handle(), None);
        assert_eq!(start(json!({ "ok": true })).handle(), None);
        assert_eq!(
            start(json!({ "taskId": true, "id": "j-2" })).handle(),
            Some(JobHandle::from("j-2"))
        );
        assert_eq!(
            start(json!({ "taskId": "", "id": 5 })).handle(),
            Some(JobHandle::from(5))
        );
    }

    #[test]
    fn test_start_response_array_is_not_an_object() {
        let response = start(json!(["x", "y"]));
        assert!(matches!(response, StartResponse::Other(_)));
        assert_eq!(response.handle(), None);
    }

    #[test]
    fn test_start_response_float_handle() {
        let response = start(json!({ "id": 2.5 }));
        assert_eq!(response.handle().map(|h| h.to_string()), Some("2.5".to_string()));
    }

    #[test]
    fn test_token_prefers_state() {
        let poll: PollResult =
            serde_json::from_value(json!({ "state": "SUCCESS", "status": "done" })).unwrap();
        assert_eq!(poll.token(), Some("SUCCESS"));

        let poll: PollResult = serde_json::from_value(json!({ "status": "FAILURE" })).unwrap();
        assert_eq!(poll.token(), Some("FAILURE"));
    }

    #[test]
    fn test_payload_truthiness() {
        assert!(!PollResult::with_state("SUCCESS").has_payload());
        assert!(!PollResult::with_state("SUCCESS").and_result(0).has_payload());
        assert!(!PollResult::with_state("SUCCESS").and_result("").has_payload());
        assert!(PollResult::with_state("SUCCESS").and_result(42).has_payload());
        assert!(PollResult::with_state("SUCCESS").and_result(json!({})).has_payload());
    }

    #[test]
    fn test_error_detail_fallbacks() {
        let poll = PollResult::with_state("FAILURE").and_error("bad input");
        assert_eq!(poll.error_detail(), "bad input");

        let poll = PollResult::with_state("FAILURE").and_error(json!({ "message": "too large" }));
        assert_eq!(poll.error_detail(), "too large");

        let poll: PollResult =
            serde_json::from_value(json!({ "state": "FAILURE", "status": "codec missing" }))
                .unwrap();
        assert_eq!(poll.error_detail(), "codec missing");

        assert_eq!(PollResult::with_state("FAILURE").error_detail(), GENERIC_FAILURE);
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let poll: PollResult =
            serde_json::from_value(json!({ "state": "PROGRESS", "progress": 40 })).unwrap();
        assert_eq!(poll.extra.get("progress"), Some(&json!(40)));
    }
}
