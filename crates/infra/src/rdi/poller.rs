//! Action polling
//!
//! Deploy, start, stop and reset return an action id immediately and finish
//! in the background. The poller waits `wait_before_polling`, then queries
//! the action every `interval` until it reaches a terminal state or
//! `max_wait` elapses. Cancellation is observed before each poll, while
//! sleeping and while a poll request is in flight.

use std::future::Future;
use std::time::Duration;

use rdi_domain::{ActionOutcome, ActionStatusReply, PipelineAction, PollingConfig, RdiError, Result};
use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Waits for RDI actions to reach a terminal state
#[derive(Debug, Clone)]
pub struct ActionPoller {
    config: PollingConfig,
}

impl ActionPoller {
    pub fn new(config: PollingConfig) -> Self {
        Self { config }
    }

    /// Poll `fetch` until the action completes, fails or times out.
    ///
    /// Returns the action's `data` (`null` when absent) on completion.
    ///
    /// # Errors
    /// - `OperationFailed(action)` carrying the reported `error` value
    /// - `OperationTimedOut` once `max_wait` has elapsed
    /// - `RdiOperationAborted` when `cancel` fires
    /// - any error `fetch` itself returns, unchanged
    #[instrument(skip(self, cancel, fetch), fields(action = %action))]
    pub async fn await_action<F, Fut>(
        &self,
        action: PipelineAction,
        action_id: &str,
        cancel: &CancellationToken,
        mut fetch: F,
    ) -> Result<Value>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<ActionStatusReply>>,
    {
        sleep_or_abort(self.config.wait_before_polling(), cancel).await?;

        let deadline = Instant::now() + self.config.max_wait();
        let mut polls: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(RdiError::aborted());
            }
            if Instant::now() > deadline {
                warn!(polls, "Action did not finish within the polling bound");
                return Err(RdiError::operation_timed_out());
            }

            polls += 1;
            let reply = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(RdiError::aborted()),
                reply = fetch() => reply?,
            };

            match ActionOutcome::from(reply) {
                ActionOutcome::Completed { data } => {
                    info!(polls, "Action completed");
                    return Ok(data);
                }
                ActionOutcome::Failed { error } => {
                    warn!(polls, error = %error, "Action failed");
                    return Err(RdiError::operation_failed(action, error));
                }
                ActionOutcome::Pending { status } => {
                    debug!(polls, %status, "Action still running");
                }
            }

            sleep_or_abort(self.config.interval(), cancel).await?;
        }
    }
}

async fn sleep_or_abort(delay: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(RdiError::aborted()),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}
