//! Long-running pipeline actions
//!
//! Deploy, start, stop and reset are executed asynchronously by RDI. The
//! submission reply carries an [`ActionHandle`]; the handle is then polled
//! until the reply reduces to a terminal [`ActionOutcome`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;

/// Pipeline operation that completes asynchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineAction {
    Deploy,
    Reset,
    Start,
    Stop,
}

impl_domain_status_conversions!(PipelineAction {
    Deploy => "deploy",
    Reset => "reset",
    Start => "start",
    Stop => "stop",
});

/// Reply to a submission call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHandle {
    pub action_id: String,
}

/// Action state as reported by RDI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Pending,
    Started,
    Running,
    Completed,
    Failed,
}

impl_domain_status_conversions!(ActionState {
    Pending => "pending",
    Started => "started",
    Running => "running",
    Completed => "completed",
    Failed => "failed",
});

/// Raw body of `GET /action/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStatusReply {
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Reduced action state
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Completed { data: Value },
    Failed { error: Value },
    /// Non-terminal; the raw status is kept for logging
    Pending { status: String },
}

impl From<ActionStatusReply> for ActionOutcome {
    fn from(reply: ActionStatusReply) -> Self {
        match ActionState::from_str(&reply.status) {
            Ok(ActionState::Completed) => Self::Completed { data: reply.data.unwrap_or(Value::Null) },
            Ok(ActionState::Failed) => Self::Failed { error: reply.error.unwrap_or(Value::Null) },
            _ => Self::Pending { status: reply.status },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reply(value: Value) -> ActionOutcome {
        serde_json::from_value::<ActionStatusReply>(value).unwrap().into()
    }

    #[test]
    fn test_completed_discards_error() {
        let outcome = reply(json!({ "status": "completed", "data": "some data", "error": "" }));
        assert_eq!(outcome, ActionOutcome::Completed { data: json!("some data") });
    }

    #[test]
    fn test_completed_without_data_is_null() {
        assert_eq!(reply(json!({ "status": "completed" })), ActionOutcome::Completed {
            data: Value::Null
        });
    }

    #[test]
    fn test_failed_keeps_error_value() {
        assert_eq!(reply(json!({ "status": "failed", "error": "X" })), ActionOutcome::Failed {
            error: json!("X")
        });
        assert_eq!(reply(json!({ "status": "failed", "error": null })), ActionOutcome::Failed {
            error: Value::Null
        });
    }

    #[test]
    fn test_unknown_status_is_pending() {
        assert_eq!(reply(json!({ "status": "started" })), ActionOutcome::Pending {
            status: "started".into()
        });
        assert_eq!(reply(json!({ "status": "queued-ish" })), ActionOutcome::Pending {
            status: "queued-ish".into()
        });
    }

    #[test]
    fn test_handle_reads_snake_case_id() {
        let handle: ActionHandle = serde_json::from_value(json!({ "action_id": "a1" })).unwrap();
        assert_eq!(handle.action_id, "a1");
    }
}
