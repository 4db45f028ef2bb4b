//! Conversion between the wire pipeline and [`RdiPipeline`]
//!
//! On the wire a pipeline is a single object whose `jobs` field is an array
//! of job definitions, each carrying its own `name`:
//!
//! ```json
//! { "targets": {...}, "sources": {...}, "jobs": [{ "name": "a", "transform": [] }] }
//! ```
//!
//! Callers work with the name-keyed form instead. Two jobs with the same name
//! collapse into one entry and the later definition wins; a warning is logged
//! because the earlier definition is lost.

use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::{RdiError, Result};
use crate::types::RdiPipeline;

const JOBS_FIELD: &str = "jobs";
const NAME_FIELD: &str = "name";

/// Split a wire pipeline into config and name-keyed jobs.
///
/// # Errors
/// Returns an invalid-response error when `data` is not a JSON object.
pub fn pipeline_from_wire(data: Value) -> Result<RdiPipeline> {
    let Value::Object(mut fields) = data else {
        return Err(RdiError::invalid_response("Pipeline payload is not a JSON object"));
    };

    let jobs = match fields.remove(JOBS_FIELD) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Array(entries)) => jobs_by_name(entries),
        // Already keyed by name
        Some(Value::Object(keyed)) => keyed,
        Some(other) => {
            return Err(RdiError::invalid_response(format!(
                "Pipeline jobs must be an array, got {}",
                json_type(&other)
            )))
        }
    };

    Ok(RdiPipeline::new(fields, jobs))
}

/// Flatten a pipeline back into the wire shape, re-inserting each job's
/// `name` from its key.
pub fn pipeline_to_wire(pipeline: &RdiPipeline) -> Value {
    let mut payload = pipeline.config.clone();

    let jobs = pipeline
        .jobs
        .iter()
        .map(|(name, body)| {
            let mut job = match body {
                Value::Object(fields) => fields.clone(),
                Value::Null => Map::new(),
                other => {
                    let mut wrapped = Map::new();
                    wrapped.insert("body".to_string(), other.clone());
                    wrapped
                }
            };
            job.insert(NAME_FIELD.to_string(), Value::String(name.clone()));
            Value::Object(job)
        })
        .collect();

    payload.insert(JOBS_FIELD.to_string(), Value::Array(jobs));
    Value::Object(payload)
}

fn jobs_by_name(entries: Vec<Value>) -> Map<String, Value> {
    let mut jobs = Map::new();

    for entry in entries {
        let Value::Object(mut job) = entry else {
            warn!("Skipping pipeline job that is not an object");
            continue;
        };

        let name = match job.remove(NAME_FIELD) {
            Some(Value::String(name)) => name,
            _ => {
                warn!("Skipping pipeline job without a string name");
                continue;
            }
        };

        if jobs.insert(name.clone(), Value::Object(job)).is_some() {
            warn!(job = %name, "Duplicate job name in pipeline, keeping the last definition");
        }
    }

    jobs
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_jobs_array_becomes_named_map() {
        let wire = json!({
            "targets": { "target": { "type": "redis" } },
            "sources": { "source": { "type": "cdc" } },
            "jobs": [
                { "name": "a", "transform": [1] },
                { "name": "b", "output": [2] }
            ]
        });

        let pipeline = pipeline_from_wire(wire).unwrap();

        assert_eq!(pipeline.jobs["a"], json!({ "transform": [1] }));
        assert_eq!(pipeline.jobs["b"], json!({ "output": [2] }));
        assert_eq!(pipeline.config.len(), 2);
        assert!(pipeline.config.contains_key("targets"));
        assert!(pipeline.config.contains_key("sources"));
        assert!(!pipeline.config.contains_key("jobs"));
    }

    #[test]
    fn test_missing_jobs_yields_empty_map() {
        let pipeline = pipeline_from_wire(json!({ "config": {} })).unwrap();
        assert!(pipeline.jobs.is_empty());
        assert_eq!(pipeline.config["config"], json!({}));
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let wire = json!({ "jobs": [
            { "name": "a", "version": 1 },
            { "name": "a", "version": 2 }
        ]});

        let pipeline = pipeline_from_wire(wire).unwrap();

        assert_eq!(pipeline.jobs.len(), 1);
        assert_eq!(pipeline.jobs["a"], json!({ "version": 2 }));
    }

    #[test]
    fn test_nameless_jobs_are_skipped() {
        let wire = json!({ "jobs": [{ "transform": [] }, "oops", { "name": "ok" }] });
        let pipeline = pipeline_from_wire(wire).unwrap();
        assert_eq!(pipeline.jobs.len(), 1);
        assert_eq!(pipeline.jobs["ok"], json!({}));
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = pipeline_from_wire(json!([1, 2])).unwrap_err();
        assert_eq!(err.error_code, crate::errors::ErrorCode::RdiInvalidResponse);

        let err = pipeline_from_wire(json!({ "jobs": "nope" })).unwrap_err();
        assert!(err.message.contains("string"));
    }

    #[test]
    fn test_round_trip_restores_names() {
        let wire = json!({
            "targets": { "t": {} },
            "jobs": [{ "name": "a", "x": 1 }, { "name": "b", "y": 2 }]
        });

        let restored = pipeline_to_wire(&pipeline_from_wire(wire).unwrap());

        assert_eq!(restored["targets"], json!({ "t": {} }));
        let jobs = restored["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.contains(&json!({ "name": "a", "x": 1 })));
        assert!(jobs.contains(&json!({ "name": "b", "y": 2 })));
    }

    #[test]
    fn test_empty_job_body_gets_name() {
        let mut jobs = Map::new();
        jobs.insert("job1".into(), json!({}));
        let wire = pipeline_to_wire(&RdiPipeline::new(Map::new(), jobs));
        assert_eq!(wire, json!({ "jobs": [{ "name": "job1" }] }));
    }
}
