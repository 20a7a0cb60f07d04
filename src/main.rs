//! @ai:module:intent CLI entry point for kernel-check
//! @ai:module:layer presentation

use anyhow::Result;
use clap::Parser;
use kernel_check::{
    report, Cli, DryRunEvaluator, KernelCheckRunner, KernelEvaluator, RemoteEvaluator,
    RunAndCheckConfig,
};
use serde_json::Value;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "kernel_check=debug"
    } else {
        "kernel_check=info"
    };

    // stdout carries only the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.build_config()?;

    let result = if cli.dry_run {
        evaluate_with(DryRunEvaluator::new(), &config).await?
    } else {
        let evaluator = RemoteEvaluator::new(&config.evaluator)?;
        tracing::debug!("Using evaluator at {}", evaluator.endpoint());
        evaluate_with(evaluator, &config).await?
    };

    report::write_result(&mut std::io::stdout().lock(), &result)?;
    Ok(())
}

/// @ai:intent Run the pipeline once with the chosen evaluator
/// @ai:effects fs:read, network
async fn evaluate_with<E: KernelEvaluator>(evaluator: E, config: &RunAndCheckConfig) -> Result<Value> {
    let runner = KernelCheckRunner::new(Arc::new(evaluator));
    Ok(runner.run(config).await?)
}
