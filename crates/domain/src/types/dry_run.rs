//! Job dry-run request and result shapes
//!
//! A dry run evaluates one job against sample input without deploying it.
//! The reply reports transformations and commands independently: either half
//! may fail while the other succeeds, and that partial outcome is expressed in
//! the result rather than as an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;

/// Body of `POST /pipeline/dry-run-job`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunJobRequest {
    pub job: Value,
    pub input_data: Value,
}

impl DryRunJobRequest {
    pub fn new(job: Value, input_data: Value) -> Self {
        Self { job, input_data }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DryRunStatus {
    Success,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl_domain_status_conversions!(DryRunStatus {
    Success => "success",
    Failed => "failed",
    Unknown => "unknown",
});

/// One half of a dry-run reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunJobResult {
    #[serde(default)]
    pub status: DryRunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl DryRunJobResult {
    pub fn is_success(&self) -> bool {
        self.status == DryRunStatus::Success
    }
}

/// Either half is absent when RDI did not report it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DryRunJobResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformations: Option<DryRunJobResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<DryRunJobResult>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_partial_failure_is_data() {
        let response: DryRunJobResponse = serde_json::from_value(json!({
            "transformations": { "status": "success", "data": { "key": "value" } },
            "commands": { "status": "failed", "error": "bad command" }
        }))
        .unwrap();

        assert!(response.transformations.is_some_and(|half| half.is_success()));
        let commands = response.commands.unwrap();
        assert!(!commands.is_success());
        assert_eq!(commands.error, Some(json!("bad command")));
    }

    #[test]
    fn test_missing_half_and_status_are_tolerated() {
        let response: DryRunJobResponse =
            serde_json::from_value(json!({ "commands": { "data": [] } })).unwrap();

        assert!(response.transformations.is_none());
        assert_eq!(response.commands.unwrap().status, DryRunStatus::Unknown);
        assert_eq!(
            serde_json::to_value(DryRunJobResponse::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let result: DryRunJobResult =
            serde_json::from_value(json!({ "status": "skipped" })).unwrap();
        assert_eq!(result.status, DryRunStatus::Unknown);
    }

    #[test]
    fn test_request_uses_snake_case_input() {
        let request = DryRunJobRequest::new(json!({ "name": "job1" }), json!({ "some": "value" }));
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({
            "job": { "name": "job1" },
            "input_data": { "some": "value" }
        }));
    }
}
