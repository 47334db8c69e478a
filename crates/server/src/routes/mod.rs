//! API route handlers for the docflow server.

pub mod health;
pub mod jobs;
pub mod upload;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router.
///
/// Routes (root-mounted, matching the original wire contract):
/// - POST /upload           — Submit a document, receive a job id
/// - POST /process          — Poll job status by body
/// - GET  /status/{job_id}  — Poll job status by path
/// - GET  /health           — Liveness check
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(upload::router())
        .merge(jobs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_routes_creation() {
        let state = AppState::new();
        let _router = api_routes(state);
    }
}
