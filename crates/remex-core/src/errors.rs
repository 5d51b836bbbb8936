//! Error types for failure handling across the execution client
//!
//! A single unified error enum covers every failure mode in the judge
//! pipeline. Errors are categorized by the stage they occur in (submission,
//! status polling, configuration) so callers can decide whether a failure
//! aborts a run or merely degrades it.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ExecError {
    #[error("submission failed: {0}")]
    Submit(String),
    #[error("status fetch failed: {0}")]
    Fetch(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("problem fetch failed: {0}")]
    Problem(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ExecError {
    fn from(err: std::io::Error) -> Self {
        ExecError::Io(err.to_string())
    }
}
