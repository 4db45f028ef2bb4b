//! Error types used throughout the RDI client
//!
//! Every failed operation produces exactly one [`RdiError`]. The error is
//! terminal for the call that produced it and carries everything the calling
//! layer needs to render a stable message: the [`RdiErrorKind`], the numeric
//! [`ErrorCode`], the HTTP status to surface and a human readable message.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::constants::{
    MSG_DEPLOY_PIPELINE_FAILURE, MSG_RESET_PIPELINE_FAILURE, MSG_START_PIPELINE_FAILURE,
    MSG_STOP_PIPELINE_FAILURE, MSG_TIMEOUT_ERROR,
};
use crate::types::PipelineAction;

/* -------------------------------------------------------------------------- */
/* Error kinds */
/* -------------------------------------------------------------------------- */

/// Domain error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "action", rename_all = "snake_case")]
pub enum RdiErrorKind {
    /// Bad or expired credentials
    Unauthorized,
    /// Credentials are valid but the action is not permitted
    Forbidden,
    /// Instance or resource absent
    NotFound,
    /// The remote action reported failure
    OperationFailed(PipelineAction),
    /// Action polling exceeded its bound
    OperationTimedOut,
    /// Unclassified upstream or transport failure
    Generic,
}

impl fmt::Display for RdiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::NotFound => write!(f, "NotFound"),
            Self::OperationFailed(action) => write!(f, "OperationFailed({action})"),
            Self::OperationTimedOut => write!(f, "OperationTimedOut"),
            Self::Generic => write!(f, "Generic"),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Stable error codes */
/* -------------------------------------------------------------------------- */

/// Stable numeric error codes consumed by API clients for localization.
///
/// Values are part of the public contract and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    RdiDeployPipelineFailure = 11_401,
    RdiUnauthorized = 11_402,
    RdiForbidden = 11_403,
    RdiNotFound = 11_404,
    RdiResetPipelineFailure = 11_405,
    RdiStartPipelineFailure = 11_406,
    RdiStopPipelineFailure = 11_407,
    RdiTimeout = 11_408,
    RdiUpstreamError = 11_409,
    RdiRequestTimeout = 11_410,
    RdiNetworkError = 11_411,
    RdiInvalidResponse = 11_412,
    RdiOperationAborted = 11_413,
    RdiConfigurationError = 11_414,
}

impl ErrorCode {
    /// Numeric value of the code
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Code reported when the given action fails remotely
    pub const fn for_failed_action(action: PipelineAction) -> Self {
        match action {
            PipelineAction::Deploy => Self::RdiDeployPipelineFailure,
            PipelineAction::Reset => Self::RdiResetPipelineFailure,
            PipelineAction::Start => Self::RdiStartPipelineFailure,
            PipelineAction::Stop => Self::RdiStopPipelineFailure,
        }
    }

    /// Look up a code by its numeric value
    pub fn from_u32(value: u32) -> Option<Self> {
        ALL_ERROR_CODES.iter().copied().find(|code| code.as_u32() == value)
    }
}

const ALL_ERROR_CODES: [ErrorCode; 14] = [
    ErrorCode::RdiDeployPipelineFailure,
    ErrorCode::RdiUnauthorized,
    ErrorCode::RdiForbidden,
    ErrorCode::RdiNotFound,
    ErrorCode::RdiResetPipelineFailure,
    ErrorCode::RdiStartPipelineFailure,
    ErrorCode::RdiStopPipelineFailure,
    ErrorCode::RdiTimeout,
    ErrorCode::RdiUpstreamError,
    ErrorCode::RdiRequestTimeout,
    ErrorCode::RdiNetworkError,
    ErrorCode::RdiInvalidResponse,
    ErrorCode::RdiOperationAborted,
    ErrorCode::RdiConfigurationError,
];

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Self::from_u32(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown RDI error code {value}")))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/* -------------------------------------------------------------------------- */
/* Domain error */
/* -------------------------------------------------------------------------- */

/// Normalized RDI error
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct RdiError {
    pub kind: RdiErrorKind,
    pub http_status: u16,
    pub message: String,
    pub error_code: ErrorCode,
    /// Values reported by the remote side for a failed action
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
    /// Raw upstream body, kept for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl RdiError {
    fn new(
        kind: RdiErrorKind,
        http_status: u16,
        error_code: ErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self { kind, http_status, message: message.into(), error_code, errors: Vec::new(), details: None }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::Unauthorized, 401, ErrorCode::RdiUnauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::Forbidden, 403, ErrorCode::RdiForbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::NotFound, 404, ErrorCode::RdiNotFound, message)
    }

    /// Remote action finished in the `failed` state.
    ///
    /// `error` is stored verbatim in [`RdiError::errors`], including `null`.
    pub fn operation_failed(action: PipelineAction, error: Value) -> Self {
        let message = failed_action_message(&error)
            .unwrap_or_else(|| default_failure_message(action).to_string());
        let mut err = Self::new(
            RdiErrorKind::OperationFailed(action),
            400,
            ErrorCode::for_failed_action(action),
            message,
        );
        err.errors.push(error);
        err
    }

    pub fn operation_timed_out() -> Self {
        Self::new(RdiErrorKind::OperationTimedOut, 408, ErrorCode::RdiTimeout, MSG_TIMEOUT_ERROR)
    }

    /// Unclassified upstream reply, status passed through
    pub fn upstream(http_status: u16, message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::Generic, http_status, ErrorCode::RdiUpstreamError, message)
    }

    pub fn request_timeout(message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::Generic, 408, ErrorCode::RdiRequestTimeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::Generic, 503, ErrorCode::RdiNetworkError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::Generic, 502, ErrorCode::RdiInvalidResponse, message)
    }

    pub fn aborted() -> Self {
        Self::new(RdiErrorKind::Generic, 499, ErrorCode::RdiOperationAborted, "Operation is aborted")
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(RdiErrorKind::Generic, 500, ErrorCode::RdiConfigurationError, message)
    }

    /// Attach the raw upstream body
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Default message for a failed action
pub const fn default_failure_message(action: PipelineAction) -> &'static str {
    match action {
        PipelineAction::Deploy => MSG_DEPLOY_PIPELINE_FAILURE,
        PipelineAction::Reset => MSG_RESET_PIPELINE_FAILURE,
        PipelineAction::Start => MSG_START_PIPELINE_FAILURE,
        PipelineAction::Stop => MSG_STOP_PIPELINE_FAILURE,
    }
}

fn failed_action_message(error: &Value) -> Option<String> {
    match error {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("message").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Result type alias for RDI operations
pub type Result<T> = std::result::Result<T, RdiError>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ErrorCode::RdiDeployPipelineFailure.as_u32(), 11_401);
        assert_eq!(ErrorCode::RdiUnauthorized.as_u32(), 11_402);
        assert_eq!(ErrorCode::RdiForbidden.as_u32(), 11_403);
        assert_eq!(ErrorCode::RdiNotFound.as_u32(), 11_404);
        assert_eq!(ErrorCode::RdiTimeout.as_u32(), 11_408);
        assert_eq!(ErrorCode::RdiConfigurationError.as_u32(), 11_414);
    }

    #[test]
    fn test_error_code_lookup_covers_table() {
        for code in ALL_ERROR_CODES {
            assert_eq!(ErrorCode::from_u32(code.as_u32()), Some(code));
        }
        assert_eq!(ErrorCode::from_u32(42), None);
    }

    #[test]
    fn test_operation_failed_keeps_raw_error() {
        let err = RdiError::operation_failed(PipelineAction::Deploy, json!("boom"));
        assert_eq!(err.kind, RdiErrorKind::OperationFailed(PipelineAction::Deploy));
        assert_eq!(err.error_code, ErrorCode::RdiDeployPipelineFailure);
        assert_eq!(err.errors, vec![json!("boom")]);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_operation_failed_with_null_error() {
        let err = RdiError::operation_failed(PipelineAction::Reset, Value::Null);
        assert_eq!(err.errors, vec![Value::Null]);
        assert_eq!(err.message, MSG_RESET_PIPELINE_FAILURE);
        assert_eq!(err.error_code, ErrorCode::RdiResetPipelineFailure);
    }

    #[test]
    fn test_operation_failed_uses_nested_message() {
        let err = RdiError::operation_failed(
            PipelineAction::Start,
            json!({ "message": "Test error", "code": 7 }),
        );
        assert_eq!(err.message, "Test error");
        assert_eq!(err.errors[0]["code"], 7);
    }

    #[test]
    fn test_serializes_code_as_number() {
        let err = RdiError::forbidden("nope");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["errorCode"], 11_403);
        assert_eq!(value["httpStatus"], 403);
        assert_eq!(value["kind"]["kind"], "forbidden");
        assert!(value.get("errors").is_none());

        let back: RdiError = serde_json::from_value(value).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_display_uses_message() {
        assert_eq!(RdiError::unauthorized("bad creds").to_string(), "bad creds");
        assert_eq!(RdiError::aborted().to_string(), "Operation is aborted");
    }
}
