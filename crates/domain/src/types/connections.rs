//! Source/target connectivity test results
//!
//! Every source and target reports its own status. An unreachable database
//! is a result entry, never a failure of the whole test.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConnectionResult {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetConnectionStatus {
    Success,
    Fail,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConnectionResult {
    pub status: TargetConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestConnectionsResponse {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConnectionResult>,
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConnectionResult>,
}
