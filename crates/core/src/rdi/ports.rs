//! Port interfaces for RDI pipeline management
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use rdi_domain::{
    DryRunJobRequest, DryRunJobResponse, RdiInstance, RdiPipeline, Result, StatisticsResult,
    TestConnectionsResponse,
};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

/// Trait for talking to one RDI deployment
///
/// Every call receives the instance it targets. Implementations own session
/// handling, so callers never see a token.
#[async_trait]
pub trait PipelineTransport: Send + Sync {
    /// Merged config and jobs JSON schemas
    async fn get_schema(&self, instance: &RdiInstance) -> Result<Value>;

    /// Fetch the deployed pipeline in name-keyed form
    async fn get_pipeline(&self, instance: &RdiInstance) -> Result<RdiPipeline>;

    /// Available pipeline strategies
    async fn get_strategies(&self, instance: &RdiInstance) -> Result<Value>;

    /// Config template for a pipeline type and source database type
    async fn get_config_template(
        &self,
        instance: &RdiInstance,
        pipeline_type: &str,
        db_type: &str,
    ) -> Result<Value>;

    /// Job template for a pipeline type
    async fn get_job_template(&self, instance: &RdiInstance, pipeline_type: &str) -> Result<Value>;

    /// Deploy a pipeline and wait for the action to finish
    async fn deploy_pipeline(
        &self,
        instance: &RdiInstance,
        pipeline: &RdiPipeline,
        cancel: &CancellationToken,
    ) -> Result<Value>;

    /// Start the pipeline and wait for the action to finish
    async fn start_pipeline(&self, instance: &RdiInstance, cancel: &CancellationToken)
        -> Result<Value>;

    /// Stop the pipeline and wait for the action to finish
    async fn stop_pipeline(&self, instance: &RdiInstance, cancel: &CancellationToken)
        -> Result<Value>;

    /// Reset the pipeline and wait for the action to finish
    async fn reset_pipeline(&self, instance: &RdiInstance, cancel: &CancellationToken)
        -> Result<Value>;

    /// Evaluate one job against sample input
    async fn dry_run_job(
        &self,
        instance: &RdiInstance,
        request: &DryRunJobRequest,
    ) -> Result<DryRunJobResponse>;

    /// Probe every source and target named in `config`
    async fn test_connections(
        &self,
        instance: &RdiInstance,
        config: &Map<String, Value>,
    ) -> Result<TestConnectionsResponse>;

    /// Runtime status of the deployed pipeline
    async fn get_pipeline_status(&self, instance: &RdiInstance) -> Result<Value>;

    /// Runtime statistics; failures are reported in the result
    async fn get_statistics(
        &self,
        instance: &RdiInstance,
        sections: Option<&str>,
    ) -> StatisticsResult;

    /// Functions usable inside job transformations
    async fn get_job_functions(&self, instance: &RdiInstance) -> Result<Value>;
}

/// Trait for resolving instance ids against the instance registry
#[async_trait]
pub trait RdiInstanceRepository: Send + Sync {
    /// Look up an instance by id
    async fn get(&self, id: &str) -> Result<Option<RdiInstance>>;
}
