// crates/server/src/routes/jobs.rs
//! Job polling endpoints.
//!
//! - POST /process        — status lookup by job id in the body
//! - GET  /status/{job_id} — same lookup via path parameter

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use docflow_core::{Job, JobId, JobStatus};

/// Request body for POST /process.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub job_id: String,
    /// Echo of the document type; informational, not used for lookup.
    pub document: String,
}

/// Snapshot of a job returned by both polling endpoints.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub result: Option<serde_json::Value>,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            result: job.result,
            progress: job.progress,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Look up a job by its raw id string.
///
/// An id that doesn't parse as a UUID was never issued by this store, so it
/// gets the same 404 as a well-formed-but-unknown one.
fn lookup_job(state: &AppState, raw_id: &str) -> ApiResult<Job> {
    Uuid::parse_str(raw_id)
        .ok()
        .and_then(|id| state.store.get(id))
        .ok_or_else(|| ApiError::JobNotFound(raw_id.to_string()))
}

/// POST /process — job status lookup by body.
async fn process_status(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProcessRequest>,
) -> ApiResult<Json<JobStatusResponse>> {
    let job = lookup_job(&state, &body.job_id)?;
    Ok(Json(job.into()))
}

/// GET /status/{job_id} — job status lookup by path parameter.
async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let job = lookup_job(&state, &job_id)?;
    Ok(Json(job.into()))
}

/// Build the job polling router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/process", post(process_status))
        .route("/status/{job_id}", get(job_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_process_request_deserialize() {
        let json = r#"{"job_id": "abc", "document": "invoice"}"#;
        let req: ProcessRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.job_id, "abc");
        assert_eq!(req.document, "invoice");
    }

    #[test]
    fn test_status_response_from_job_keeps_wire_fields() {
        let store = docflow_core::JobStore::new();
        let id = store.create("invoice", json!({"amount": 1}), None);
        let job = store.get(id).unwrap();

        let response = JobStatusResponse::from(job);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["job_id"], json!(id.to_string()));
        assert_eq!(value["status"], "pending");
        assert_eq!(value["progress"], 0);
        assert!(value["result"].is_null());
        assert!(value["created_at"].is_string());
        assert!(value["updated_at"].is_string());
        // Internal fields never leak into the polling response.
        assert!(value.get("content").is_none());
        assert!(value.get("document_type").is_none());
    }

    #[test]
    fn test_lookup_rejects_malformed_and_unknown_ids() {
        let state = crate::state::AppState::new();

        assert!(matches!(
            lookup_job(&state, "not-a-uuid"),
            Err(ApiError::JobNotFound(_))
        ));
        assert!(matches!(
            lookup_job(&state, &Uuid::new_v4().to_string()),
            Err(ApiError::JobNotFound(_))
        ));
    }
}
