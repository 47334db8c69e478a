// crates/core/src/store.rs
//! In-memory job registry shared between the HTTP layer and the runner.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::job::{Job, JobId, JobStatus};

/// Thread-safe registry mapping job ids to job records.
///
/// Backed by a `std::sync::RwLock` (not `tokio::sync`): operations are
/// short, synchronous, and the lock is never held across an `.await` point.
/// Each operation's writes — status, progress, result, `updated_at` — land
/// under one write-lock acquisition, so a snapshot can never observe a torn
/// update.
///
/// Mutation methods return `bool` rather than silently no-opping: `false`
/// means the job was absent (or, for status changes, the transition was
/// refused). Callers that want best-effort semantics are free to ignore it.
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a fresh `pending` job and return its id. Never fails.
    pub fn create(
        &self,
        document_type: impl Into<String>,
        content: serde_json::Value,
        metadata: Option<serde_json::Value>,
    ) -> JobId {
        let job = Job::new(document_type, content, metadata);
        let id = job.id;
        match self.jobs.write() {
            Ok(mut jobs) => {
                jobs.insert(id, job);
            }
            Err(e) => tracing::error!("RwLock poisoned inserting job: {e}"),
        }
        id
    }

    /// Snapshot lookup. `None` is a normal outcome, not an error — an
    /// unknown id is indistinguishable from a job that never existed.
    pub fn get(&self, id: JobId) -> Option<Job> {
        match self.jobs.read() {
            Ok(jobs) => jobs.get(&id).cloned(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading jobs map: {e}");
                None
            }
        }
    }

    /// Transition a job's status, refreshing `updated_at` and replacing
    /// `result` only when one is supplied.
    ///
    /// Returns `false` if the job is absent or the transition is not a
    /// legal edge of the status machine (in particular, terminal jobs are
    /// never touched).
    pub fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        result: Option<serde_json::Value>,
    ) -> bool {
        match self.jobs.write() {
            Ok(mut jobs) => {
                let Some(job) = jobs.get_mut(&id) else {
                    return false;
                };
                if !job.status.can_transition_to(status) {
                    tracing::warn!(
                        job_id = %id,
                        from = job.status.as_str(),
                        to = status.as_str(),
                        "Refusing illegal status transition"
                    );
                    return false;
                }
                job.status = status;
                if let Some(result) = result {
                    job.result = Some(result);
                }
                job.updated_at = Utc::now();
                true
            }
            Err(e) => {
                tracing::error!("RwLock poisoned updating job status: {e}");
                false
            }
        }
    }

    /// Apply an in-place update to a live (non-terminal) job, refreshing
    /// `updated_at`. Covers the runner's direct field pokes: progress and
    /// mid-flight partial results.
    ///
    /// The closure must keep any status change it makes on a legal edge of
    /// the machine; terminal jobs are refused before it runs.
    pub fn mutate(&self, id: JobId, f: impl FnOnce(&mut Job)) -> bool {
        match self.jobs.write() {
            Ok(mut jobs) => {
                let Some(job) = jobs.get_mut(&id) else {
                    return false;
                };
                if job.status.is_terminal() {
                    return false;
                }
                f(job);
                job.updated_at = Utc::now();
                true
            }
            Err(e) => {
                tracing::error!("RwLock poisoned mutating job: {e}");
                false
            }
        }
    }

    /// Remove a job if present. Idempotent; `true` if a record was removed.
    pub fn delete(&self, id: JobId) -> bool {
        match self.jobs.write() {
            Ok(mut jobs) => jobs.remove(&id).is_some(),
            Err(e) => {
                tracing::error!("RwLock poisoned deleting job: {e}");
                false
            }
        }
    }

    /// Number of tracked jobs.
    pub fn len(&self) -> usize {
        match self.jobs.read() {
            Ok(jobs) => jobs.len(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading jobs map: {e}");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
