//! RDI HTTP transport

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use rdi_core::PipelineTransport;
use rdi_domain::utils::{keys_to_camel_case, pipeline_from_wire, pipeline_to_wire};
use rdi_domain::{
    ActionHandle, ActionStatusReply, DryRunJobRequest, DryRunJobResponse, PipelineAction,
    RdiClientConfig, RdiError, RdiInstance, RdiPipeline, Result, SourceConnectionResult,
    StatisticsResult, TargetConnectionResult, TestConnectionsResponse,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::normalizer::read_json;
use super::poller::ActionPoller;
use super::session::SessionManager;
use super::urls;
use crate::http::HttpClient;

#[derive(Deserialize)]
struct TargetsReply {
    #[serde(default)]
    targets: BTreeMap<String, TargetConnectionResult>,
}

/// [`PipelineTransport`] over the RDI REST API
///
/// One client serves every instance: sessions are keyed by instance id and
/// the instance is passed to each call.
pub struct RdiApiClient {
    http: HttpClient,
    sessions: Arc<SessionManager>,
    poller: ActionPoller,
}

impl RdiApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// Fails if the underlying HTTP client cannot be built.
    pub fn new(config: &RdiClientConfig) -> Result<Self> {
        Ok(Self::with_http_client(HttpClient::from_config(config)?, config))
    }

    /// Create a client around an existing HTTP client
    pub fn with_http_client(http: HttpClient, config: &RdiClientConfig) -> Self {
        let sessions = Arc::new(SessionManager::new(http.clone(), config.token_expiry_margin()));
        Self { http, sessions, poller: ActionPoller::new(config.polling.clone()) }
    }

    /// Session store shared with this client
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Send an authenticated request.
    ///
    /// A 401 reply evicts the token that was used; the response is still
    /// returned for normalization.
    async fn send_authorized<B>(
        &self,
        instance: &RdiInstance,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let token = self.sessions.ensure_session(instance).await?;

        let mut request = self.http.request(method, url).header(AUTHORIZATION, token.bearer());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.sessions.discard(&instance.id, &token).await;
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, instance: &RdiInstance, url: Url) -> Result<T> {
        let response = self.send_authorized::<Value>(instance, Method::GET, url, None).await?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, instance: &RdiInstance, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.send_authorized(instance, Method::POST, url, Some(body)).await?;
        read_json(response).await
    }

    async fn get_path<T: DeserializeOwned>(
        &self,
        instance: &RdiInstance,
        path: &str,
        segments: &[&str],
    ) -> Result<T> {
        self.get_json(instance, urls::endpoint(&instance.url, path, segments)?).await
    }

    async fn action_status(
        &self,
        instance: &RdiInstance,
        action_id: &str,
    ) -> Result<ActionStatusReply> {
        self.get_path(instance, urls::ACTION, &[action_id]).await
    }

    /// Submit an asynchronous action and wait for its outcome
    async fn run_action(
        &self,
        instance: &RdiInstance,
        action: PipelineAction,
        path: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let url = urls::endpoint(&instance.url, path, &[])?;
        let submitted: Value = self.post_json(instance, url, body).await?;
        let handle: ActionHandle = serde_json::from_value(submitted).map_err(|_| {
            RdiError::invalid_response(format!("RDI did not return an action id for {action}"))
        })?;

        debug!(action_id = %handle.action_id, "Action submitted");

        let action_id = handle.action_id.as_str();
        self.poller
            .await_action(action, action_id, cancel, move || self.action_status(instance, action_id))
            .await
    }

    async fn fetch_statistics(
        &self,
        instance: &RdiInstance,
        sections: Option<&str>,
    ) -> Result<Value> {
        let mut url = urls::endpoint(&instance.url, urls::STATISTICS, &[])?;
        if let Some(sections) = sections {
            url.query_pairs_mut().append_pair("sections", sections);
        }
        self.get_json(instance, url).await
    }

    async fn test_source(
        &self,
        instance: &RdiInstance,
        source: &Value,
    ) -> Result<SourceConnectionResult> {
        let url = urls::endpoint(&instance.url, urls::TEST_SOURCE_CONNECTION, &[])?;
        self.post_json(instance, url, source).await
    }
}

#[async_trait]
impl PipelineTransport for RdiApiClient {
    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_schema(&self, instance: &RdiInstance) -> Result<Value> {
        let (config, jobs) = tokio::try_join!(
            self.get_path::<Value>(instance, urls::CONFIG_SCHEMA, &[]),
            self.get_path::<Value>(instance, urls::JOBS_SCHEMA, &[]),
        )?;

        Ok(json!({ "config": config, "jobs": jobs }))
    }

    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_pipeline(&self, instance: &RdiInstance) -> Result<RdiPipeline> {
        let data: Value = self.get_path(instance, urls::PIPELINE, &[]).await?;
        pipeline_from_wire(data)
    }

    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_strategies(&self, instance: &RdiInstance) -> Result<Value> {
        self.get_path(instance, urls::STRATEGIES, &[]).await
    }

    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_config_template(
        &self,
        instance: &RdiInstance,
        pipeline_type: &str,
        db_type: &str,
    ) -> Result<Value> {
        self.get_path(instance, urls::CONFIG_TEMPLATE, &[pipeline_type, db_type]).await
    }

    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_job_template(&self, instance: &RdiInstance, pipeline_type: &str) -> Result<Value> {
        self.get_path(instance, urls::JOB_TEMPLATE, &[pipeline_type]).await
    }

    #[instrument(skip(self, instance, pipeline, cancel), fields(instance_id = %instance.id))]
    async fn deploy_pipeline(
        &self,
        instance: &RdiInstance,
        pipeline: &RdiPipeline,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let payload = pipeline_to_wire(pipeline);
        let data =
            self.run_action(instance, PipelineAction::Deploy, urls::DEPLOY, &payload, cancel).await?;
        info!("Pipeline deployed");
        Ok(data)
    }

    #[instrument(skip(self, instance, cancel), fields(instance_id = %instance.id))]
    async fn start_pipeline(
        &self,
        instance: &RdiInstance,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.run_action(instance, PipelineAction::Start, urls::START_PIPELINE, &json!({}), cancel)
            .await
    }

    #[instrument(skip(self, instance, cancel), fields(instance_id = %instance.id))]
    async fn stop_pipeline(
        &self,
        instance: &RdiInstance,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.run_action(instance, PipelineAction::Stop, urls::STOP_PIPELINE, &json!({}), cancel)
            .await
    }

    #[instrument(skip(self, instance, cancel), fields(instance_id = %instance.id))]
    async fn reset_pipeline(
        &self,
        instance: &RdiInstance,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.run_action(instance, PipelineAction::Reset, urls::RESET_PIPELINE, &json!({}), cancel)
            .await
    }

    #[instrument(skip(self, instance, request), fields(instance_id = %instance.id))]
    async fn dry_run_job(
        &self,
        instance: &RdiInstance,
        request: &DryRunJobRequest,
    ) -> Result<DryRunJobResponse> {
        let url = urls::endpoint(&instance.url, urls::DRY_RUN_JOB, &[])?;
        self.post_json(instance, url, request).await
    }

    #[instrument(skip(self, instance, config), fields(instance_id = %instance.id))]
    async fn test_connections(
        &self,
        instance: &RdiInstance,
        config: &Map<String, Value>,
    ) -> Result<TestConnectionsResponse> {
        let url = urls::endpoint(&instance.url, urls::TEST_TARGETS_CONNECTIONS, &[])?;
        let TargetsReply { targets } = self.post_json(instance, url, config).await?;

        let sources = config.get("sources").and_then(Value::as_object);
        let probes = sources.into_iter().flatten().map(|(name, source)| async move {
            (name.clone(), self.test_source(instance, source).await)
        });

        let mut results = BTreeMap::new();
        for (name, outcome) in join_all(probes).await {
            match outcome {
                Ok(result) => {
                    results.insert(name, result);
                }
                Err(err) => {
                    warn!(source = %name, error = %err, "Failed to fetch sources");
                }
            }
        }

        Ok(TestConnectionsResponse { sources: results, targets })
    }

    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_pipeline_status(&self, instance: &RdiInstance) -> Result<Value> {
        self.get_path(instance, urls::PIPELINE_STATUS, &[]).await
    }

    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_statistics(
        &self,
        instance: &RdiInstance,
        sections: Option<&str>,
    ) -> StatisticsResult {
        match self.fetch_statistics(instance, sections).await {
            Ok(data) => StatisticsResult::Success { data: keys_to_camel_case(data) },
            Err(err) => {
                warn!(error = %err, status = err.http_status, "Failed to fetch RDI statistics");
                StatisticsResult::Failed { error: err.message }
            }
        }
    }

    #[instrument(skip(self, instance), fields(instance_id = %instance.id))]
    async fn get_job_functions(&self, instance: &RdiInstance) -> Result<Value> {
        self.get_path(instance, urls::JOB_FUNCTIONS, &[]).await
    }
}
