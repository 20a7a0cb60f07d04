//! @ai:module:intent Boundary to the external kernel evaluation service
//! @ai:module:layer infrastructure
//! @ai:module:public_api KernelEvaluator, EvaluationRequest, RemoteEvaluator, DryRunEvaluator, MockEvaluator

pub mod dry_run;
pub mod mock;
pub mod remote;

pub use dry_run::DryRunEvaluator;
pub use mock::MockEvaluator;
pub use remote::RemoteEvaluator;

use crate::config::ValidatedConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// @ai:intent Request body sent to the evaluator; field names are part of the wire contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub level: i64,
    pub problem_id: i64,
    pub backend: String,
    pub kernel_code: String,
    pub dataset_src: String,
    pub num_correct_trials: u32,
    pub measure_performance: bool,
    pub num_perf_trials: u32,
    pub timing_method: String,
    pub precision: String,
    pub check_for_excessive_speedup: bool,
    pub excessive_speedup_threshold: f64,
    /// Seconds, copied from `modal_timeout`.
    pub timeout: f64,
}

impl EvaluationRequest {
    /// @ai:intent Build a request from validated configuration and prepared code
    /// @ai:effects pure
    pub fn new(config: &ValidatedConfig, kernel_code: String) -> Self {
        let settings = config.settings();

        Self {
            level: config.level(),
            problem_id: config.problem_id(),
            backend: settings.backend.clone(),
            kernel_code,
            dataset_src: settings.dataset_src.clone(),
            num_correct_trials: settings.num_correct_trials,
            measure_performance: settings.measure_performance,
            num_perf_trials: settings.num_perf_trials,
            timing_method: settings.timing_method.clone(),
            precision: settings.precision.clone(),
            check_for_excessive_speedup: settings.check_for_excessive_speedup,
            excessive_speedup_threshold: settings.excessive_speedup_threshold,
            timeout: settings.modal_timeout,
        }
    }
}

/// @ai:intent Evaluates a candidate kernel against its reference problem
#[allow(async_fn_in_trait)]
pub trait KernelEvaluator: Send + Sync {
    /// @ai:intent Run one evaluation; the result is an opaque JSON mapping
    /// @ai:pre timeout > 0
    async fn evaluate(&self, request: &EvaluationRequest, timeout: Duration) -> Result<Value>;
}
