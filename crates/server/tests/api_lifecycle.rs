// crates/server/tests/api_lifecycle.rs
//! End-to-end lifecycle tests over the real router.
//!
//! Uses the built-in placeholder handlers with millisecond delays injected
//! through `AppState::with_parts`, so full submit → poll → terminal flows
//! run without multi-second sleeps.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

use docflow_core::handlers::{ContractHandler, InvoiceHandler};
use docflow_core::{HandlerRegistry, JobRunner, JobStore};
use docflow_server::{create_app_with_state, AppState};

/// App wired with fast handlers: 10ms of simulated work, instant finalize.
fn fast_app() -> Router {
    let store = Arc::new(JobStore::new());

    let mut registry = HandlerRegistry::new();
    registry.register(
        "invoice",
        Arc::new(InvoiceHandler::with_delay(Duration::from_millis(10))),
    );
    registry.register(
        "contract",
        Arc::new(ContractHandler::with_delay(Duration::from_millis(10))),
    );

    let runner = Arc::new(
        JobRunner::new(Arc::clone(&store), Arc::new(registry))
            .with_finalize_delay(Duration::ZERO),
    );

    create_app_with_state(AppState::with_parts(store, runner))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(app: &Router, uri: &str, body: String) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn upload(app: &Router, body: &str) -> String {
    let (status, response) = post_json(app, "/upload", body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    response["job_id"].as_str().unwrap().to_string()
}

/// Poll /status until the job reaches a terminal state.
async fn poll_until_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (status, body) = get(app, &format!("/status/{job_id}")).await;
            assert_eq!(status, StatusCode::OK);
            let observed = body["status"].as_str().unwrap();
            if observed == "completed" || observed == "failed" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("job never reached a terminal state")
}

#[tokio::test]
async fn test_invoice_lifecycle_to_completion() {
    let app = fast_app();
    let job_id = upload(&app, r#"{"type": "invoice", "content": {"amount": 1000}}"#).await;

    // Immediately after submission the snapshot is a valid early state.
    let (status, early) = get(&app, &format!("/status/{job_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let observed = early["status"].as_str().unwrap();
    assert!(["pending", "processing"].contains(&observed), "got {observed}");

    let done = poll_until_terminal(&app, &job_id).await;
    assert_eq!(done["status"], "completed");
    assert_eq!(done["progress"], 100);

    let result = &done["result"];
    let number = result["invoice_number"].as_str().unwrap();
    let digits: u32 = number.strip_prefix("INV-").unwrap().parse().unwrap();
    assert!((1000..=9999).contains(&digits));
    let amount = result["amount"].as_f64().unwrap();
    assert!((100.0..10000.0).contains(&amount));
    assert_eq!(result["status"], "processed");
}

#[tokio::test]
async fn test_contract_lifecycle_to_completion() {
    let app = fast_app();
    let job_id = upload(
        &app,
        r#"{"type": "contract", "content": {"parties": ["Party A", "Party B"]}}"#,
    )
    .await;

    let done = poll_until_terminal(&app, &job_id).await;
    assert_eq!(done["status"], "completed");
    assert_eq!(done["progress"], 100);

    let result = &done["result"];
    assert!(result["contract_number"].as_str().unwrap().starts_with("CON-"));
    assert_eq!(result["parties"], serde_json::json!(["Party A", "Party B"]));
    assert_eq!(result["signed_by"], serde_json::json!(["Party A", "Party B"]));
    assert_eq!(result["status"], "signed");
    assert!(result["effective_date"].is_string());
}

#[tokio::test]
async fn test_process_endpoint_sees_terminal_state() {
    let app = fast_app();
    let job_id = upload(&app, r#"{"type": "invoice", "content": {"amount": 250}}"#).await;

    poll_until_terminal(&app, &job_id).await;

    let (status, body) = post_json(
        &app,
        "/process",
        format!(r#"{{"job_id": "{job_id}", "document": "invoice"}}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job_id"], job_id.as_str());
    assert_eq!(body["status"], "completed");
    assert_eq!(body["progress"], 100);
}

#[tokio::test]
async fn test_terminal_job_reads_are_identical() {
    let app = fast_app();
    let job_id = upload(&app, r#"{"type": "invoice", "content": {"amount": 10}}"#).await;

    let first = poll_until_terminal(&app, &job_id).await;
    let (_, second) = get(&app, &format!("/status/{job_id}")).await;
    let (_, third) = get(&app, &format!("/status/{job_id}")).await;

    // No further mutation after the terminal state: byte-for-byte identical
    // snapshots, updated_at included.
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[tokio::test]
async fn test_unknown_job_stays_404_across_endpoints() {
    let app = fast_app();

    let (status, body) = get(&app, "/status/7e32d0d5-2f0c-4e96-9cb0-8f7a4c6a3c11").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Job not found");

    let (status, body) = post_json(
        &app,
        "/process",
        r#"{"job_id": "nonexistent-job-123", "document": "invoice"}"#.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Job not found");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fifty_concurrent_jobs_complete_independently() {
    let app = fast_app();

    // Alternate types so result shapes differ between neighbors.
    let mut jobs = Vec::new();
    for i in 0..50 {
        let body = if i % 2 == 0 {
            format!(r#"{{"type": "invoice", "content": {{"index": {i}}}}}"#)
        } else {
            format!(r#"{{"type": "contract", "content": {{"index": {i}}}}}"#)
        };
        let job_id = upload(&app, &body).await;
        jobs.push((job_id, i));
    }

    let mut seen = std::collections::HashSet::new();
    for (job_id, i) in jobs {
        assert!(seen.insert(job_id.clone()), "duplicate job id issued");

        let done = poll_until_terminal(&app, &job_id).await;
        assert_eq!(done["status"], "completed", "job {i} did not complete");
        assert_eq!(done["progress"], 100);

        // Each job carries its own type's result shape — no bleed between
        // neighboring jobs.
        let result = &done["result"];
        if i % 2 == 0 {
            assert!(result["invoice_number"].is_string(), "job {i} lost its invoice result");
            assert!(result.get("contract_number").is_none());
        } else {
            assert!(result["contract_number"].is_string(), "job {i} lost its contract result");
            assert!(result.get("invoice_number").is_none());
        }
    }
}
