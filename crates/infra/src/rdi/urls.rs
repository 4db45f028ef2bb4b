//! Upstream endpoint paths and URL construction

use rdi_domain::{RdiError, Result};
use url::Url;

use crate::errors::InfraError;

pub const LOGIN: &str = "login";
pub const PIPELINE: &str = "pipeline";
pub const DEPLOY: &str = "pipeline/deploy";
pub const DRY_RUN_JOB: &str = "pipeline/dry-run-job";
pub const RESET_PIPELINE: &str = "pipeline/reset";
pub const START_PIPELINE: &str = "pipeline/start";
pub const STOP_PIPELINE: &str = "pipeline/stop";
pub const TEST_TARGETS_CONNECTIONS: &str = "pipeline/test-connections";
pub const TEST_SOURCE_CONNECTION: &str = "pipeline/test-source-connection";
pub const STRATEGIES: &str = "pipeline/strategies";
pub const CONFIG_TEMPLATE: &str = "pipeline/config/template";
pub const JOB_TEMPLATE: &str = "pipeline/job/template";
pub const CONFIG_SCHEMA: &str = "pipeline/config-schema";
pub const JOBS_SCHEMA: &str = "pipeline/jobs-schema";
pub const JOB_FUNCTIONS: &str = "pipeline/job-functions";
pub const PIPELINE_STATUS: &str = "status";
pub const STATISTICS: &str = "statistics";
pub const ACTION: &str = "action";

/// Join `path` and any extra `segments` onto an instance base URL.
///
/// The base may carry its own path prefix (`https://host/api`); it is kept.
/// Extra segments are percent-encoded, so caller supplied values such as an
/// action id can never escape their position in the path.
///
/// # Errors
/// Returns a configuration error if `base` is not an absolute URL that can
/// carry a path.
pub fn endpoint(base: &str, path: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|err| RdiError::from(InfraError::from(err)))?;

    {
        let mut parts = url
            .path_segments_mut()
            .map_err(|()| RdiError::config(format!("RDI instance URL cannot be a base: {base}")))?;
        parts.pop_if_empty();
        parts.extend(path.split('/').filter(|part| !part.is_empty()));
        parts.extend(segments);
    }

    Ok(url)
}
