//! RDI pipeline service - id-based facade over the transport

use std::sync::Arc;

use rdi_domain::constants::MSG_INVALID_INSTANCE_ID;
use rdi_domain::{
    DryRunJobRequest, DryRunJobResponse, RdiError, RdiInstance, RdiPipeline, Result,
    StatisticsResult, TestConnectionsResponse,
};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::ports::{PipelineTransport, RdiInstanceRepository};

/// Pipeline operations addressed by instance id
pub struct RdiPipelineService {
    instances: Arc<dyn RdiInstanceRepository>,
    transport: Arc<dyn PipelineTransport>,
}

impl RdiPipelineService {
    /// Create a new pipeline service
    pub fn new(
        instances: Arc<dyn RdiInstanceRepository>,
        transport: Arc<dyn PipelineTransport>,
    ) -> Self {
        Self { instances, transport }
    }

    async fn resolve(&self, id: &str) -> Result<RdiInstance> {
        self.instances.get(id).await?.ok_or_else(|| RdiError::not_found(MSG_INVALID_INSTANCE_ID))
    }

    #[instrument(skip(self))]
    pub async fn get_schema(&self, id: &str) -> Result<Value> {
        let instance = self.resolve(id).await?;
        self.transport.get_schema(&instance).await
    }

    #[instrument(skip(self))]
    pub async fn get_pipeline(&self, id: &str) -> Result<RdiPipeline> {
        let instance = self.resolve(id).await?;
        self.transport.get_pipeline(&instance).await
    }

    #[instrument(skip(self))]
    pub async fn get_strategies(&self, id: &str) -> Result<Value> {
        let instance = self.resolve(id).await?;
        self.transport.get_strategies(&instance).await
    }

    #[instrument(skip(self))]
    pub async fn get_config_template(
        &self,
        id: &str,
        pipeline_type: &str,
        db_type: &str,
    ) -> Result<Value> {
        let instance = self.resolve(id).await?;
        self.transport.get_config_template(&instance, pipeline_type, db_type).await
    }

    #[instrument(skip(self))]
    pub async fn get_job_template(&self, id: &str, pipeline_type: &str) -> Result<Value> {
        let instance = self.resolve(id).await?;
        self.transport.get_job_template(&instance, pipeline_type).await
    }

    /// Deploy a pipeline and wait for RDI to finish applying it
    #[instrument(skip(self, pipeline, cancel), fields(jobs = pipeline.jobs.len()))]
    pub async fn deploy_pipeline(
        &self,
        id: &str,
        pipeline: &RdiPipeline,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let instance = self.resolve(id).await?;
        let data = self.transport.deploy_pipeline(&instance, pipeline, cancel).await?;
        info!(instance_id = %id, "Pipeline deployed");
        Ok(data)
    }

    #[instrument(skip(self, cancel))]
    pub async fn start_pipeline(&self, id: &str, cancel: &CancellationToken) -> Result<Value> {
        let instance = self.resolve(id).await?;
        let data = self.transport.start_pipeline(&instance, cancel).await?;
        info!(instance_id = %id, "Pipeline started");
        Ok(data)
    }

    #[instrument(skip(self, cancel))]
    pub async fn stop_pipeline(&self, id: &str, cancel: &CancellationToken) -> Result<Value> {
        let instance = self.resolve(id).await?;
        let data = self.transport.stop_pipeline(&instance, cancel).await?;
        info!(instance_id = %id, "Pipeline stopped");
        Ok(data)
    }

    #[instrument(skip(self, cancel))]
    pub async fn reset_pipeline(&self, id: &str, cancel: &CancellationToken) -> Result<Value> {
        let instance = self.resolve(id).await?;
        let data = self.transport.reset_pipeline(&instance, cancel).await?;
        info!(instance_id = %id, "Pipeline reset");
        Ok(data)
    }

    #[instrument(skip(self, request))]
    pub async fn dry_run_job(
        &self,
        id: &str,
        request: &DryRunJobRequest,
    ) -> Result<DryRunJobResponse> {
        let instance = self.resolve(id).await?;
        self.transport.dry_run_job(&instance, request).await
    }

    #[instrument(skip(self, config))]
    pub async fn test_connections(
        &self,
        id: &str,
        config: &Map<String, Value>,
    ) -> Result<TestConnectionsResponse> {
        let instance = self.resolve(id).await?;
        self.transport.test_connections(&instance, config).await
    }

    #[instrument(skip(self))]
    pub async fn get_pipeline_status(&self, id: &str) -> Result<Value> {
        let instance = self.resolve(id).await?;
        self.transport.get_pipeline_status(&instance).await
    }

    /// Fetch statistics. Never fails; an unknown id is reported in the result.
    #[instrument(skip(self))]
    pub async fn get_statistics(&self, id: &str, sections: Option<&str>) -> StatisticsResult {
        match self.resolve(id).await {
            Ok(instance) => self.transport.get_statistics(&instance, sections).await,
            Err(err) => {
                warn!(instance_id = %id, error = %err, "Cannot fetch statistics");
                StatisticsResult::Failed { error: err.message }
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_job_functions(&self, id: &str) -> Result<Value> {
        let instance = self.resolve(id).await?;
        self.transport.get_job_functions(&instance).await
    }
}
