// crates/server/src/lib.rs
//! docflow server library.
//!
//! Axum HTTP boundary over the `docflow-core` job subsystem: document
//! submission, status polling, and a health check. The boundary owns
//! validation and absence-to-404 translation; all lifecycle semantics live
//! in the core.

pub mod error;
pub mod routes;
pub mod state;

pub use error::*;
pub use routes::api_routes;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with the production state.
pub fn create_app() -> Router {
    create_app_with_state(AppState::new())
}

/// Create the Axum application around an injected state.
///
/// This sets up:
/// - API routes (upload, process, status, health)
/// - CORS (allows any origin, matching the original service)
/// - Request tracing
pub fn create_app_with_state(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
