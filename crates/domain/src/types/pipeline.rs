//! Pipeline definition in the shape this client exposes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pipeline as exposed to callers
///
/// `config` holds every top-level wire field except `jobs` (targets, sources,
/// processors, ...). `jobs` is keyed by job name; each body is the job
/// definition without its `name` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RdiPipeline {
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub jobs: Map<String, Value>,
}

impl RdiPipeline {
    pub fn new(config: Map<String, Value>, jobs: Map<String, Value>) -> Self {
        Self { config, jobs }
    }
}
