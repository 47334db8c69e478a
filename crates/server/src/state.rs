// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use docflow_core::handlers::{ContractHandler, InvoiceHandler};
use docflow_core::{HandlerRegistry, JobRunner, JobStore};

/// Shared application state accessible from all route handlers.
///
/// Explicitly constructed at process start and injected into the router —
/// never a module-level singleton — so tests get isolated stores without
/// global reset hooks.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// In-memory job registry shared with the runner.
    pub store: Arc<JobStore>,
    /// Background runner executing document-processing jobs.
    pub runner: Arc<JobRunner>,
}

impl AppState {
    /// Create the production state: fresh store, built-in handler table
    /// (`invoice`, `contract`), default runner timings.
    pub fn new() -> Arc<Self> {
        let store = Arc::new(JobStore::new());

        let mut registry = HandlerRegistry::new();
        registry.register("invoice", Arc::new(InvoiceHandler::new()));
        registry.register("contract", Arc::new(ContractHandler::new()));

        let runner = Arc::new(JobRunner::new(Arc::clone(&store), Arc::new(registry)));
        Self::with_parts(store, runner)
    }

    /// Create with an externally-built store and runner (tests inject
    /// deterministic handlers and fast timings through here).
    pub fn with_parts(store: Arc<JobStore>, runner: Arc<JobRunner>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            store,
            runner,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
