// crates/server/src/routes/upload.rs
//! Document submission endpoint.
//!
//! POST /upload — validate the submission, create the job, schedule the
//! runner, and acknowledge immediately with the job id. Processing happens
//! in the background; callers poll /status or /process.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use docflow_core::JobId;

/// Document types accepted at the boundary.
///
/// Anything else is rejected by the extractor with 422 before the core sees
/// the submission. The core keys its handler table by plain string, so its
/// own unknown-type rejection stays reachable for direct (non-HTTP) callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    Contract,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Contract => "contract",
        }
    }
}

/// Request body for POST /upload. Field names follow the original API
/// (`type`, `metaData`).
#[derive(Debug, Deserialize)]
pub struct DocumentUpload {
    #[serde(rename = "type")]
    pub document_type: DocumentKind,
    pub content: serde_json::Value,
    #[serde(rename = "metaData")]
    pub metadata: Option<serde_json::Value>,
}

/// Response for POST /upload.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct UploadResponse {
    pub job_id: JobId,
    pub message: String,
    pub timestamp: String,
}

/// POST /upload — accept a document and schedule processing.
async fn upload_document(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DocumentUpload>,
) -> Json<UploadResponse> {
    let document_type = body.document_type.as_str();
    let job_id = state.store.create(document_type, body.content, body.metadata);
    state.runner.submit(job_id);

    tracing::info!(job_id = %job_id, document_type, "Document accepted");

    Json(UploadResponse {
        job_id,
        message: "Document received. Processing started.".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Build the upload router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/upload", post(upload_document))
}
