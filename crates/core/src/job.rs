// crates/core/src/job.rs
//! The job record and its status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a job, assigned at creation.
pub type JobId = Uuid;

/// Lifecycle status of a job.
///
/// Transitions are forward-only:
/// `pending → processing → {completed, failed}`, plus the direct
/// `pending → failed` edge for submissions with no registered handler.
/// `completed` and `failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status permits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether `next` is a legal transition from this status.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Pending, Failed) | (Processing, Completed) | (Processing, Failed)
        )
    }

    /// Lowercase wire form, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// One submitted document's tracked processing record.
///
/// `id`, `document_type`, `content`, and `metadata` are immutable after
/// creation; everything else is written only through [`JobStore`] operations,
/// which refresh `updated_at` as a unit with the fields they change.
///
/// [`JobStore`]: crate::store::JobStore
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Percentage in [0, 100]; non-decreasing until a terminal state freezes it.
    pub progress: u8,
    pub document_type: String,
    pub content: serde_json::Value,
    pub metadata: Option<serde_json::Value>,
    /// Output written by the handler (or failure handling). May appear
    /// mid-flight as partial progress info before the job turns terminal.
    pub result: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a fresh `pending` record with a new v4 id.
    pub(crate) fn new(
        document_type: impl Into<String>,
        content: serde_json::Value,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            progress: 0,
            document_type: document_type.into(),
            content,
            metadata,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }
}
