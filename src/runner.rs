//! @ai:module:intent Drive one evaluation from configuration to opaque result
//! @ai:module:layer application
//! @ai:module:public_api KernelCheckRunner, read_kernel_source
//! @ai:module:stateless false

use crate::config::RunAndCheckConfig;
use crate::error::{Result, RunError};
use crate::evaluator::{EvaluationRequest, KernelEvaluator};
use crate::extract::CodeExtractor;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// @ai:intent Validates configuration, prepares the kernel and calls the evaluator once
pub struct KernelCheckRunner<E: KernelEvaluator> {
    evaluator: Arc<E>,
    extractor: CodeExtractor,
}

impl<E: KernelEvaluator> KernelCheckRunner<E> {
    /// @ai:intent Create a runner around an evaluator
    /// @ai:effects pure
    pub fn new(evaluator: Arc<E>) -> Self {
        Self {
            evaluator,
            extractor: CodeExtractor::new(),
        }
    }

    /// @ai:intent Run the pipeline; nothing reaches the evaluator unless validation and the read succeed
    /// @ai:effects fs:read, network
    pub async fn run(&self, config: &RunAndCheckConfig) -> Result<Value> {
        let validated = config.validate()?;
        tracing::debug!(
            level = validated.level(),
            problem_id = validated.problem_id(),
            "Configuration validated"
        );

        let raw = read_kernel_source(validated.kernel_src_path()).await?;
        let kernel_code = self.extractor.prepare_kernel_code(&raw);

        let request = EvaluationRequest::new(&validated, kernel_code);

        tracing::info!(
            "Evaluating kernel {} against level {} problem {} (backend={}, timeout={:.1}s)",
            validated.kernel_src_path().display(),
            request.level,
            request.problem_id,
            request.backend,
            validated.timeout().as_secs_f64()
        );

        let result = self
            .evaluator
            .evaluate(&request, validated.timeout())
            .await
            .map_err(RunError::Evaluation)?;

        tracing::info!("Evaluation finished");
        Ok(result)
    }
}

/// @ai:intent Read the kernel source as UTF-8 text
/// @ai:effects fs:read
pub async fn read_kernel_source(path: &Path) -> Result<String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RunError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::MockEvaluator;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_kernel(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("k.py");
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn kernelbench_config(kernel_src_path: String) -> RunAndCheckConfig {
        RunAndCheckConfig {
            ref_origin: "kernelbench".to_string(),
            level: Some(1),
            problem_id: Some(5),
            kernel_src_path,
            backend: "triton".to_string(),
            ..Default::default()
        }
    }

    fn runner(evaluator: &Arc<MockEvaluator>) -> KernelCheckRunner<MockEvaluator> {
        KernelCheckRunner::new(Arc::clone(evaluator))
    }

    #[tokio::test]
    async fn test_run_passes_defaults_through_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = write_kernel(&dir, "def f(): pass");
        let evaluator = Arc::new(MockEvaluator::returning(json!({"compiled": true})));

        let result = runner(&evaluator).run(&kernelbench_config(path)).await.unwrap();
        assert_eq!(result, json!({"compiled": true}));

        let calls = evaluator.calls();
        assert_eq!(calls.len(), 1);

        let (request, timeout) = &calls[0];
        assert_eq!(
            request,
            &EvaluationRequest {
                level: 1,
                problem_id: 5,
                backend: "triton".to_string(),
                kernel_code: "def f(): pass".to_string(),
                dataset_src: "huggingface".to_string(),
                num_correct_trials: 5,
                measure_performance: true,
                num_perf_trials: 100,
                timing_method: "cuda_event".to_string(),
                precision: "fp32".to_string(),
                check_for_excessive_speedup: true,
                excessive_speedup_threshold: 10.0,
                timeout: 120.0,
            }
        );
        assert_eq!(*timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_run_strips_fence_from_kernel_file() {
        let dir = TempDir::new().unwrap();
        let path = write_kernel(&dir, "```python\nX\n```");
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        runner(&evaluator).run(&kernelbench_config(path)).await.unwrap();

        assert_eq!(evaluator.calls()[0].0.kernel_code, "X");
    }

    #[tokio::test]
    async fn test_run_forwards_tuning_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_kernel(&dir, "pass");
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        let config = RunAndCheckConfig {
            num_correct_trials: 1,
            num_perf_trials: 7,
            measure_performance: false,
            timing_method: "do_bench".to_string(),
            precision: "bf16".to_string(),
            check_for_excessive_speedup: false,
            excessive_speedup_threshold: 3.0,
            modal_timeout: 30.0,
            dataset_src: "local".to_string(),
            ..kernelbench_config(path)
        };
        runner(&evaluator).run(&config).await.unwrap();

        let (request, timeout) = &evaluator.calls()[0];
        assert_eq!(request.num_correct_trials, 1);
        assert_eq!(request.num_perf_trials, 7);
        assert!(!request.measure_performance);
        assert_eq!(request.timing_method, "do_bench");
        assert_eq!(request.precision, "bf16");
        assert!(!request.check_for_excessive_speedup);
        assert_eq!(request.excessive_speedup_threshold, 3.0);
        assert_eq!(request.dataset_src, "local");
        assert_eq!(request.timeout, 30.0);
        assert_eq!(*timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_missing_path_fails_before_file_io() {
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        let err = runner(&evaluator)
            .run(&kernelbench_config(String::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Configuration(ref m) if m == "kernel_src_path is required."));
        assert!(evaluator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_ref_origin_never_reaches_evaluator() {
        let dir = TempDir::new().unwrap();
        let path = write_kernel(&dir, "pass");
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        let config = RunAndCheckConfig {
            ref_origin: "local".to_string(),
            ..kernelbench_config(path)
        };
        let err = runner(&evaluator).run(&config).await.unwrap_err();

        assert!(matches!(err, RunError::Configuration(_)));
        assert!(evaluator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_problem_identity_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = write_kernel(&dir, "pass");
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        for (level, problem_id) in [(None, Some(5)), (Some(1), None), (None, None)] {
            let config = RunAndCheckConfig {
                level,
                problem_id,
                ..kernelbench_config(path.clone())
            };
            let err = runner(&evaluator).run(&config).await.unwrap_err();
            assert!(matches!(err, RunError::Configuration(_)));
        }
        assert!(evaluator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_zero_identifiers_are_evaluated() {
        let dir = TempDir::new().unwrap();
        let path = write_kernel(&dir, "pass");
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        let config = RunAndCheckConfig {
            level: Some(0),
            problem_id: Some(0),
            ..kernelbench_config(path)
        };
        runner(&evaluator).run(&config).await.unwrap();

        let (request, _) = &evaluator.calls()[0];
        assert_eq!((request.level, request.problem_id), (0, 0));
    }

    #[tokio::test]
    async fn test_missing_file_is_file_access_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.py").to_string_lossy().into_owned();
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        let err = runner(&evaluator).run(&kernelbench_config(path)).await.unwrap_err();

        match err {
            RunError::FileAccess { path, source } => {
                assert!(path.ends_with("absent.py"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected file access error, got {other:?}"),
        }
        assert!(evaluator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_configuration_checked_before_file_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.py").to_string_lossy().into_owned();
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        let config = RunAndCheckConfig {
            ref_origin: "local".to_string(),
            ..kernelbench_config(path)
        };
        let err = runner(&evaluator).run(&config).await.unwrap_err();

        assert!(matches!(err, RunError::Configuration(ref m) if m == "ref_origin must be 'kernelbench'."));
    }

    #[tokio::test]
    async fn test_non_utf8_kernel_is_file_access_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("k.py");
        std::fs::write(&path, [0xffu8, 0xfe]).unwrap();
        let evaluator = Arc::new(MockEvaluator::returning(json!({})));

        let err = runner(&evaluator)
            .run(&kernelbench_config(path.to_string_lossy().into_owned()))
            .await
            .unwrap_err();

        match err {
            RunError::FileAccess { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
            other => panic!("expected file access error, got {other:?}"),
        }
        assert!(evaluator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_evaluator_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let path = write_kernel(&dir, "pass");
        let evaluator = Arc::new(MockEvaluator::failing("remote sandbox timed out"));

        let err = runner(&evaluator).run(&kernelbench_config(path)).await.unwrap_err();

        match err {
            RunError::Evaluation(inner) => {
                assert_eq!(inner.to_string(), "remote sandbox timed out")
            }
            other => panic!("expected evaluation error, got {other:?}"),
        }
        assert_eq!(evaluator.calls().len(), 1);
    }
}
