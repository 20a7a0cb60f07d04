//! @ai:module:intent HTTP client for the remote kernel evaluation service
//! @ai:module:layer infrastructure
//! @ai:module:public_api RemoteEvaluator
//! @ai:module:stateless true

use crate::config::EvaluatorConfig;
use crate::evaluator::{EvaluationRequest, KernelEvaluator};
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

/// @ai:intent Posts evaluation requests as JSON to a single endpoint, no retries
pub struct RemoteEvaluator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteEvaluator {
    /// @ai:intent Create a client for the configured endpoint
    /// @ai:pre config.endpoint is an http(s) URL
    /// @ai:effects pure
    pub fn new(config: &EvaluatorConfig) -> Result<Self> {
        let endpoint = reqwest::Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid evaluator endpoint `{}`", config.endpoint))?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl KernelEvaluator for RemoteEvaluator {
    /// @ai:intent Send the request and wait at most `timeout` for the response
    /// @ai:effects network
    async fn evaluate(&self, request: &EvaluationRequest, timeout: Duration) -> Result<Value> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .timeout(timeout)
            .json(request);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        tracing::debug!("POST {}", self.endpoint);

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(
                    "Evaluation timed out after {:.1}s",
                    timeout.as_secs_f64()
                )
            } else {
                anyhow::Error::new(e).context("Failed to send request to evaluator")
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Evaluator error ({}): {}", status, error_text);
        }

        response
            .json::<Value>()
            .await
            .context("Failed to parse evaluator response")
    }
}
