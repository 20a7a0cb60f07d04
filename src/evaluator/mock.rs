//! @ai:module:intent In-memory evaluator that records requests
//! @ai:module:layer infrastructure
//! @ai:module:public_api MockEvaluator
//! @ai:module:stateless false

use crate::evaluator::{EvaluationRequest, KernelEvaluator};
use anyhow::Result;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

enum MockOutcome {
    Succeed(Value),
    Fail(String),
}

/// @ai:intent Mock evaluator for testing; returns a fixed outcome and keeps every request
pub struct MockEvaluator {
    outcome: MockOutcome,
    calls: Mutex<Vec<(EvaluationRequest, Duration)>>,
}

impl MockEvaluator {
    /// @ai:intent Create a mock that returns the given result
    /// @ai:effects pure
    pub fn returning(result: Value) -> Self {
        Self {
            outcome: MockOutcome::Succeed(result),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Create a mock whose every call fails with the given message
    /// @ai:effects pure
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Fail(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// @ai:intent Requests received so far, with the timeout each was given
    pub fn calls(&self) -> Vec<(EvaluationRequest, Duration)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl KernelEvaluator for MockEvaluator {
    /// @ai:effects state:write
    async fn evaluate(&self, request: &EvaluationRequest, timeout: Duration) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((request.clone(), timeout));
        }

        match &self.outcome {
            MockOutcome::Succeed(value) => Ok(value.clone()),
            MockOutcome::Fail(message) => anyhow::bail!("{message}"),
        }
    }
}
