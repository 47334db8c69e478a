// crates/core/src/runner.rs
//! Background job runner: executes the handler for a job's document type
//! and drives the job through the status machine.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::task::JoinHandle;

use crate::handler::{HandlerRegistry, JobContext};
use crate::job::{JobId, JobStatus};
use crate::store::JobStore;

/// Delay of the finalization step, mirroring the short settle phase the
/// processing pipeline performs after a handler finishes.
const FINALIZE_DELAY: Duration = Duration::from_millis(500);

/// Executes document-processing jobs asynchronously.
///
/// `submit` spawns the job onto the Tokio runtime and returns immediately;
/// the job is `pending` at return time and transitions through the store as
/// it runs. The runner is the only component that sets terminal status, so
/// a handler error or panic always lands the job in `failed` rather than
/// leaving it stuck `processing`.
pub struct JobRunner {
    store: Arc<JobStore>,
    registry: Arc<HandlerRegistry>,
    finalize_delay: Duration,
}

impl JobRunner {
    pub fn new(store: Arc<JobStore>, registry: Arc<HandlerRegistry>) -> Self {
        Self {
            store,
            registry,
            finalize_delay: FINALIZE_DELAY,
        }
    }

    /// Override the finalize-step delay (tests).
    pub fn with_finalize_delay(mut self, delay: Duration) -> Self {
        self.finalize_delay = delay;
        self
    }

    /// Schedule execution of a previously created job without blocking.
    ///
    /// The returned handle is the hook for awaiting (tests) or aborting
    /// (future cancellation) the job task; dropping it detaches the task.
    pub fn submit(&self, job_id: JobId) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let registry = Arc::clone(&self.registry);
        let finalize_delay = self.finalize_delay;
        tokio::spawn(async move {
            run_job(store, registry, job_id, finalize_delay).await;
        })
    }
}

async fn run_job(
    store: Arc<JobStore>,
    registry: Arc<HandlerRegistry>,
    job_id: JobId,
    finalize_delay: Duration,
) {
    let Some(job) = store.get(job_id) else {
        tracing::warn!(job_id = %job_id, "Submitted job not found in store");
        return;
    };

    // Registry miss: immediate rejection, `processing` is never entered.
    let Some(handler) = registry.get(&job.document_type) else {
        tracing::warn!(
            job_id = %job_id,
            document_type = %job.document_type,
            "No handler registered for document type"
        );
        store.update_status(
            job_id,
            JobStatus::Failed,
            Some(json!({
                "error": format!("Invalid document type: {}", job.document_type)
            })),
        );
        return;
    };

    if !store.update_status(job_id, JobStatus::Processing, None) {
        // Deleted (or otherwise gone) between submission and start.
        tracing::warn!(job_id = %job_id, "Job vanished before processing started");
        return;
    }
    tracing::debug!(job_id = %job_id, document_type = %job.document_type, "Processing started");

    // The handler runs on its own task so a panic surfaces as a JoinError
    // instead of leaving the job stuck in `processing`.
    let ctx = JobContext::new(Arc::clone(&store), job_id);
    let handler_task = tokio::spawn(async move { handler.process(&ctx).await });

    match handler_task.await {
        Ok(Ok(())) => {
            finalize(&store, job_id, finalize_delay).await;
        }
        Ok(Err(e)) => {
            tracing::warn!(job_id = %job_id, error = %e, "Handler failed");
            store.update_status(job_id, JobStatus::Failed, Some(json!({"error": e.to_string()})));
        }
        Err(join_err) => {
            let detail = if join_err.is_panic() {
                "processing panicked".to_string()
            } else {
                format!("processing task aborted: {join_err}")
            };
            tracing::error!(job_id = %job_id, error = %detail, "Handler task did not finish");
            store.update_status(job_id, JobStatus::Failed, Some(json!({"error": detail})));
        }
    }
}

/// Terminal step for a successful job: a short settle delay, then
/// `progress = 100` and `completed` written as one atomic store operation.
async fn finalize(store: &JobStore, job_id: JobId, delay: Duration) {
    tokio::time::sleep(delay).await;
    let finalized = store.mutate(job_id, |job| {
        job.progress = 100;
        job.status = JobStatus::Completed;
    });
    if finalized {
        tracing::info!(job_id = %job_id, "Job completed");
    } else {
        tracing::warn!(job_id = %job_id, "Finalize skipped: job missing or already terminal");
    }
}
