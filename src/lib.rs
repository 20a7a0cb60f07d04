//! @ai:module:intent Run-and-check: evaluate a candidate kernel against a KernelBench problem
//! @ai:module:layer application
//! @ai:module:public_api cli, config, error, evaluator, extract, report, runner

pub mod cli;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod extract;
pub mod report;
pub mod runner;

pub use cli::Cli;
pub use config::{EvaluatorConfig, RunAndCheckConfig, ValidatedConfig};
pub use error::{Result, RunError};
pub use evaluator::{
    DryRunEvaluator, EvaluationRequest, KernelEvaluator, MockEvaluator, RemoteEvaluator,
};
pub use extract::{extract_code_block, prepare_kernel_code, CodeExtractor};
pub use runner::KernelCheckRunner;
