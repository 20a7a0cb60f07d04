//! @ai:module:intent Command-line surface and configuration layering
//! @ai:module:layer presentation
//! @ai:module:public_api Cli

use crate::config::RunAndCheckConfig;
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kernel-check")]
#[command(about = "Check a candidate kernel against a KernelBench reference problem")]
#[command(version)]
pub struct Cli {
    /// TOML file providing configuration values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reference resolution mode (only "kernelbench" is supported)
    #[arg(long)]
    pub ref_origin: Option<String>,

    /// KernelBench level
    #[arg(long, allow_hyphen_values = true)]
    pub level: Option<i64>,

    /// KernelBench problem id within the level
    #[arg(long, allow_hyphen_values = true)]
    pub problem_id: Option<i64>,

    /// Dataset source (e.g. huggingface)
    #[arg(long)]
    pub dataset_src: Option<String>,

    /// Path to the candidate kernel source
    #[arg(long, short = 'k')]
    pub kernel_src_path: Option<String>,

    /// Target execution backend
    #[arg(long, short)]
    pub backend: Option<String>,

    #[arg(long)]
    pub num_correct_trials: Option<u32>,

    #[arg(long)]
    pub num_perf_trials: Option<u32>,

    #[arg(long)]
    pub measure_performance: Option<bool>,

    #[arg(long)]
    pub timing_method: Option<String>,

    #[arg(long)]
    pub precision: Option<String>,

    #[arg(long)]
    pub check_for_excessive_speedup: Option<bool>,

    #[arg(long)]
    pub excessive_speedup_threshold: Option<f64>,

    /// Seconds the evaluator may spend on the request
    #[arg(long)]
    pub modal_timeout: Option<f64>,

    /// Evaluation service endpoint
    #[arg(long, env = "KERNEL_EVAL_URL")]
    pub eval_url: Option<String>,

    /// Bearer token for the evaluation service
    #[arg(long, env = "KERNEL_EVAL_API_KEY", hide_env_values = true)]
    pub eval_api_key: Option<String>,

    /// Print the request that would be sent instead of contacting the evaluator
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// key=value overrides applied last (e.g. level=1 problem_id=5)
    #[arg(value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

impl Cli {
    /// @ai:intent Layer defaults, config file, flags and key=value overrides, in that order
    /// @ai:effects fs:read
    pub fn build_config(&self) -> Result<RunAndCheckConfig> {
        let base = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                RunAndCheckConfig::load(path)?
            }
            None => RunAndCheckConfig::default(),
        };

        self.apply_flags(base).with_overrides(&self.overrides)
    }

    /// @ai:effects pure
    fn apply_flags(&self, mut config: RunAndCheckConfig) -> RunAndCheckConfig {
        if let Some(ref_origin) = &self.ref_origin {
            config.ref_origin = ref_origin.clone();
        }
        if self.level.is_some() {
            config.level = self.level;
        }
        if self.problem_id.is_some() {
            config.problem_id = self.problem_id;
        }
        if let Some(dataset_src) = &self.dataset_src {
            config.dataset_src = dataset_src.clone();
        }
        if let Some(path) = &self.kernel_src_path {
            config.kernel_src_path = path.clone();
        }
        if let Some(backend) = &self.backend {
            config.backend = backend.clone();
        }
        if let Some(trials) = self.num_correct_trials {
            config.num_correct_trials = trials;
        }
        if let Some(trials) = self.num_perf_trials {
            config.num_perf_trials = trials;
        }
        if let Some(measure) = self.measure_performance {
            config.measure_performance = measure;
        }
        if let Some(method) = &self.timing_method {
            config.timing_method = method.clone();
        }
        if let Some(precision) = &self.precision {
            config.precision = precision.clone();
        }
        if let Some(check) = self.check_for_excessive_speedup {
            config.check_for_excessive_speedup = check;
        }
        if let Some(threshold) = self.excessive_speedup_threshold {
            config.excessive_speedup_threshold = threshold;
        }
        if let Some(timeout) = self.modal_timeout {
            config.modal_timeout = timeout;
        }
        if let Some(url) = &self.eval_url {
            config.evaluator.endpoint = url.clone();
        }
        if let Some(key) = &self.eval_api_key {
            config.evaluator.api_key = Some(key.clone());
        }

        config
    }
}
