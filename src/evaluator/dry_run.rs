//! @ai:module:intent Evaluator that echoes the request without contacting the service
//! @ai:module:layer infrastructure
//! @ai:module:public_api DryRunEvaluator
//! @ai:module:stateless true

use crate::evaluator::{EvaluationRequest, KernelEvaluator};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;

/// @ai:intent Returns what would have been sent, marked as a dry run
pub struct DryRunEvaluator;

impl DryRunEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DryRunEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelEvaluator for DryRunEvaluator {
    /// @ai:effects pure
    async fn evaluate(&self, request: &EvaluationRequest, timeout: Duration) -> Result<Value> {
        tracing::info!("[DRY RUN] No evaluation request sent");

        let request = serde_json::to_value(request).context("Failed to serialize request")?;

        Ok(json!({
            "dry_run": true,
            "timeout_secs": timeout.as_secs_f64(),
            "request": request,
        }))
    }
}
