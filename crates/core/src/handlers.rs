// crates/core/src/handlers.rs
//! Built-in placeholder handlers.
//!
//! These stand in for real document extraction: a fixed delay of simulated
//! work, then a randomized result payload. The delay is injectable so tests
//! never sleep for seconds; the random values are placeholders, not
//! semantics.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;

use crate::error::HandlerError;
use crate::handler::{DocumentHandler, JobContext};

const INVOICE_DELAY: Duration = Duration::from_secs(2);
const CONTRACT_DELAY: Duration = Duration::from_secs(3);

/// Simulated invoice extraction.
pub struct InvoiceHandler {
    delay: Duration,
}

impl InvoiceHandler {
    pub fn new() -> Self {
        Self { delay: INVOICE_DELAY }
    }

    /// Override the simulated-work delay (tests).
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for InvoiceHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentHandler for InvoiceHandler {
    async fn process(&self, ctx: &JobContext) -> Result<(), HandlerError> {
        tokio::time::sleep(self.delay).await;

        // ThreadRng is not Send; keep it out of scope across await points.
        let (progress, result) = {
            let mut rng = rand::thread_rng();
            let amount = (rng.gen_range(100.0..10000.0f64) * 100.0).round() / 100.0;
            (
                rng.gen_range(50..=99u8),
                json!({
                    "invoice_number": format!("INV-{}", rng.gen_range(1000..=9999)),
                    "amount": amount,
                    "status": "processed",
                }),
            )
        };

        ctx.set_progress(progress);
        ctx.set_result(result);
        Ok(())
    }
}

/// Simulated contract extraction.
pub struct ContractHandler {
    delay: Duration,
}

impl ContractHandler {
    pub fn new() -> Self {
        Self { delay: CONTRACT_DELAY }
    }

    /// Override the simulated-work delay (tests).
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for ContractHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentHandler for ContractHandler {
    async fn process(&self, ctx: &JobContext) -> Result<(), HandlerError> {
        tokio::time::sleep(self.delay).await;

        let (progress, result) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(50..=99u8),
                json!({
                    "contract_number": format!("CON-{}", rng.gen_range(1000..=9999)),
                    "parties": ["Party A", "Party B"],
                    "effective_date": chrono::Utc::now().date_naive().to_string(),
                    "status": "signed",
                    "signed_by": ["Party A", "Party B"],
                }),
            )
        };

        ctx.set_progress(progress);
        ctx.set_result(result);
        Ok(())
    }
}
