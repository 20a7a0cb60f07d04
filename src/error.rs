//! @ai:module:intent Error taxonomy for a single run-and-check invocation
//! @ai:module:layer domain
//! @ai:module:public_api RunError, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Every way a run can fail; all variants are fatal to the run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read kernel source {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opaque failure reported by the evaluator, passed through unchanged.
    #[error("evaluation failed: {0}")]
    Evaluation(#[source] anyhow::Error),
}

impl RunError {
    /// @ai:intent Shorthand for building a configuration error
    /// @ai:effects pure
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
