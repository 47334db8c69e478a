// crates/core/src/handler.rs
//! The pluggable handler seam: one routine per document type.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::job::{Job, JobId};
use crate::store::JobStore;

/// A document-processing routine, selected by document type.
///
/// Implementations write progress and a type-specific result through the
/// [`JobContext`] while they run. They never set terminal status — the
/// runner owns that, so a handler cannot leave a job half-finalized.
///
/// The built-in implementations simulate work ([`crate::handlers`]); tests
/// register deterministic ones.
#[async_trait]
pub trait DocumentHandler: Send + Sync {
    async fn process(&self, ctx: &JobContext) -> Result<(), HandlerError>;
}

/// Handler-side view of the job being processed.
///
/// All writes go through the store's atomic per-job operations, so pollers
/// never observe a torn update. This is also the boundary where a future
/// cancellation hook would be threaded through without touching the store
/// contract.
pub struct JobContext {
    store: Arc<JobStore>,
    job_id: JobId,
}

impl JobContext {
    pub fn new(store: Arc<JobStore>, job_id: JobId) -> Self {
        Self { store, job_id }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Snapshot of the job record (content, metadata, current progress).
    pub fn job(&self) -> Option<Job> {
        self.store.get(self.job_id)
    }

    /// Record partial progress. Clamped to 99 — only the runner's finalize
    /// step reports 100.
    pub fn set_progress(&self, progress: u8) -> bool {
        let progress = progress.min(99);
        self.store.mutate(self.job_id, |job| {
            // Progress is non-decreasing while the job is live.
            if progress > job.progress {
                job.progress = progress;
            }
        })
    }

    /// Write the (possibly partial) result payload.
    pub fn set_result(&self, result: serde_json::Value) -> bool {
        self.store.mutate(self.job_id, |job| job.result = Some(result))
    }
}

/// Registry mapping document types to their handlers.
///
/// Constructed at startup and injected into the runner; a submission whose
/// type has no entry fails immediately without entering `processing`.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn DocumentHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a document type, replacing any existing one.
    pub fn register(&mut self, document_type: impl Into<String>, handler: Arc<dyn DocumentHandler>) {
        self.handlers.insert(document_type.into(), handler);
    }

    /// Look up the handler for a document type.
    pub fn get(&self, document_type: &str) -> Option<Arc<dyn DocumentHandler>> {
        self.handlers.get(document_type).cloned()
    }

    /// Registered document types, for logging.
    pub fn document_types(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }
}
