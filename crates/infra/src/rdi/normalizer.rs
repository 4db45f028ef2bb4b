//! Upstream failure normalization
//!
//! RDI reports errors in several body shapes depending on which layer
//! rejected the request. [`BODY_MATCHERS`] is tried in order and the first
//! shape that yields a message wins; new shapes are appended to the list.

use rdi_domain::{RdiError, Result};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::InfraError;

type BodyMatcher = fn(&Value) -> Option<String>;

/// Known error body shapes, in priority order
const BODY_MATCHERS: &[BodyMatcher] = &[top_level_message, top_level_detail, nested_response_message];

/// `{ "message": "..." }`
fn top_level_message(body: &Value) -> Option<String> {
    non_empty(body.get("message"))
}

/// `{ "detail": "..." }`
fn top_level_detail(body: &Value) -> Option<String> {
    non_empty(body.get("detail"))
}

/// `{ "response": { "data": { "message": "..." } } }`
fn nested_response_message(body: &Value) -> Option<String> {
    non_empty(body.pointer("/response/data/message"))
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).filter(|message| !message.is_empty()).map(str::to_string)
}

/// First message any matcher extracts from `body`
pub fn extract_message(body: &Value) -> Option<String> {
    BODY_MATCHERS.iter().find_map(|matcher| matcher(body))
}

/// Map an upstream status and body to the domain error taxonomy.
///
/// The raw body is attached as details unless it is empty.
pub fn normalize(status: u16, body: Value) -> RdiError {
    let message = extract_message(&body)
        .unwrap_or_else(|| format!("Request failed with status code {status}"));

    let error = match status {
        401 => RdiError::unauthorized(message),
        403 => RdiError::forbidden(message),
        404 => RdiError::not_found(message),
        _ => RdiError::upstream(status, message),
    };

    if body.is_null() {
        error
    } else {
        error.with_details(body)
    }
}

/// Read a non-success response and normalize it.
///
/// Bodies that are not JSON are kept as a string.
pub async fn error_from_response(response: Response) -> RdiError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(text) => parse_body(&text),
        Err(err) => {
            debug!(status, error = %err, "Failed to read error body");
            Value::Null
        }
    };

    normalize(status, body)
}

/// Decode a response: 2xx bodies into `T`, anything else through
/// [`normalize`].
///
/// An empty 2xx body decodes as JSON `null`.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let text = response.text().await.map_err(|err| RdiError::from(InfraError::from(err)))?;
    let text = if text.trim().is_empty() { "null" } else { text.as_str() };

    serde_json::from_str(text).map_err(|err| RdiError::from(InfraError::from(err)))
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
