//! Judge service abstractions and wire implementations.
//!
//! Defines the `JudgeClient` trait the rest of the pipeline is written
//! against, plus the Judge0 HTTP implementation. Keeping the seam here lets
//! tests drive the poller and session against a scripted mock service.

use crate::core_types::{JudgeResult, Language, SubmissionRequest, SubmissionToken};
use crate::errors::ExecError;
use async_trait::async_trait;

pub mod judge0;

pub use judge0::Judge0Client;

/// Client for a remote code-execution service. Every call is one outbound
/// network request; implementations must not cache status reads.
#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// Submit source code for execution and return the token that keys all
    /// subsequent status polls.
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionToken, ExecError>;

    /// Fetch the current state of a submission. A fresh remote read on every
    /// call.
    async fn fetch_status(&self, token: &SubmissionToken) -> Result<JudgeResult, ExecError>;

    /// Fetch the service's language catalog.
    async fn languages(&self) -> Result<Vec<Language>, ExecError>;
}
