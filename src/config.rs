//! @ai:module:intent Configuration record for a run-and-check invocation
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunAndCheckConfig, EvaluatorConfig, ValidatedConfig
//! @ai:module:stateless true

use crate::error::{Result, RunError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// The only reference origin currently understood by the evaluator.
pub const KERNELBENCH_ORIGIN: &str = "kernelbench";

/// @ai:intent All recognized options for one evaluation run
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunAndCheckConfig {
    pub ref_origin: String,
    pub level: Option<i64>,
    pub problem_id: Option<i64>,
    pub dataset_src: String,

    pub kernel_src_path: String,
    pub backend: String,

    pub num_correct_trials: u32,
    pub num_perf_trials: u32,
    pub measure_performance: bool,
    pub timing_method: String,
    pub precision: String,
    pub check_for_excessive_speedup: bool,
    pub excessive_speedup_threshold: f64,
    /// Seconds the evaluator may spend on the request.
    pub modal_timeout: f64,

    pub evaluator: EvaluatorConfig,
}

/// @ai:intent Where and how to reach the evaluation service
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for RunAndCheckConfig {
    fn default() -> Self {
        Self {
            ref_origin: KERNELBENCH_ORIGIN.to_string(),
            level: None,
            problem_id: None,
            dataset_src: "huggingface".to_string(),
            kernel_src_path: String::new(),
            backend: "triton".to_string(),
            num_correct_trials: 5,
            num_perf_trials: 100,
            measure_performance: true,
            timing_method: "cuda_event".to_string(),
            precision: "fp32".to_string(),
            check_for_excessive_speedup: true,
            excessive_speedup_threshold: 10.0,
            modal_timeout: 120.0,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/evaluate".to_string()
}

impl RunAndCheckConfig {
    /// @ai:intent Load configuration from a TOML file, defaulting missing keys
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RunError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| {
            RunError::config(format!("invalid config file {}: {e}", path.display()))
        })
    }

    /// @ai:intent Apply every key=value override in order
    /// @ai:effects pure
    pub fn with_overrides<S: AsRef<str>>(self, assignments: &[S]) -> Result<Self> {
        assignments
            .iter()
            .try_fold(self, |config, assignment| config.with_override(assignment.as_ref()))
    }

    /// @ai:intent Apply a single key=value override; keys accept '-' or '_'
    /// @ai:effects pure
    pub fn with_override(mut self, assignment: &str) -> Result<Self> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            RunError::config(format!("override `{assignment}` is not of the form key=value"))
        })?;
        let key = key.trim().replace('-', "_");
        let value = value.trim();

        match key.as_str() {
            "ref_origin" => self.ref_origin = value.to_string(),
            "level" => self.level = parse_optional(&key, value)?,
            "problem_id" => self.problem_id = parse_optional(&key, value)?,
            "dataset_src" => self.dataset_src = value.to_string(),
            "kernel_src_path" => self.kernel_src_path = value.to_string(),
            "backend" => self.backend = value.to_string(),
            "num_correct_trials" => self.num_correct_trials = parse_value(&key, value)?,
            "num_perf_trials" => self.num_perf_trials = parse_value(&key, value)?,
            "measure_performance" => self.measure_performance = parse_bool(&key, value)?,
            "timing_method" => self.timing_method = value.to_string(),
            "precision" => self.precision = value.to_string(),
            "check_for_excessive_speedup" => {
                self.check_for_excessive_speedup = parse_bool(&key, value)?
            }
            "excessive_speedup_threshold" => {
                self.excessive_speedup_threshold = parse_value(&key, value)?
            }
            "modal_timeout" => self.modal_timeout = parse_value(&key, value)?,
            "evaluator.endpoint" => self.evaluator.endpoint = value.to_string(),
            "evaluator.api_key" => {
                self.evaluator.api_key = Some(value.to_string()).filter(|k| !k.is_empty())
            }
            other => {
                return Err(RunError::config(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }

        Ok(self)
    }

    /// @ai:intent Check required fields and produce a typed, validated view
    /// @ai:effects pure
    /// @ai:post first failing check determines the error
    pub fn validate(&self) -> Result<ValidatedConfig> {
        if self.kernel_src_path.is_empty() {
            return Err(RunError::config("kernel_src_path is required."));
        }

        if self.ref_origin != KERNELBENCH_ORIGIN {
            return Err(RunError::config("ref_origin must be 'kernelbench'."));
        }

        let level = self.level.ok_or_else(|| {
            RunError::config("level is required for ref_origin=kernelbench.")
        })?;

        let problem_id = self.problem_id.ok_or_else(|| {
            RunError::config("problem_id is required for ref_origin=kernelbench.")
        })?;

        if self.modal_timeout <= 0.0 {
            return Err(RunError::config(format!(
                "modal_timeout must be a positive number of seconds, got {}",
                self.modal_timeout
            )));
        }

        let timeout = Duration::try_from_secs_f64(self.modal_timeout).map_err(|e| {
            RunError::config(format!(
                "modal_timeout {} is not a usable number of seconds: {e}",
                self.modal_timeout
            ))
        })?;

        Ok(ValidatedConfig {
            level,
            problem_id,
            kernel_src_path: PathBuf::from(&self.kernel_src_path),
            timeout,
            settings: self.clone(),
        })
    }
}

/// @ai:intent Configuration that passed validation; required fields are present
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    level: i64,
    problem_id: i64,
    kernel_src_path: PathBuf,
    timeout: Duration,
    settings: RunAndCheckConfig,
}

impl ValidatedConfig {
    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn problem_id(&self) -> i64 {
        self.problem_id
    }

    pub fn kernel_src_path(&self) -> &Path {
        &self.kernel_src_path
    }

    /// Upper bound for the single evaluator call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn settings(&self) -> &RunAndCheckConfig {
        &self.settings
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| RunError::config(format!("invalid value `{value}` for {key}: {e}")))
}

/// `None`, `null` and the empty string clear an optional field.
fn parse_optional<T>(key: &str, value: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match value.to_ascii_lowercase().as_str() {
        "" | "none" | "null" => Ok(None),
        _ => parse_value(key, value).map(Some),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(RunError::config(format!(
            "invalid value `{value}` for {key}: expected a boolean"
        ))),
    }
}
