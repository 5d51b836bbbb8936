//! Core data types shared across the execution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single piece of source code queued for remote execution. Immutable once
/// sent; a new run builds a fresh request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
}

/// Opaque identifier handed back by the judge service on submission. Every
/// subsequent poll for that run is keyed by this token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionToken(String);

impl SubmissionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status code reported by the judge service for a submission. The numeric
/// range is defined by the service: 1 (In Queue) and 2 (Processing) are
/// in-progress, everything above is terminal (3 Accepted, 6 Compilation
/// Error, and whatever else the service defines).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JudgeStatus {
    pub id: u32,
    #[serde(default)]
    pub description: String,
}

impl JudgeStatus {
    /// Highest status id still considered in-progress.
    pub const IN_PROGRESS_MAX: u32 = 2;

    pub fn is_terminal(&self) -> bool {
        self.id > Self::IN_PROGRESS_MAX
    }
}

/// One observation of a submission's state, as returned by a status fetch.
/// Output channels absent from the wire response are normalized to empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeResult {
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
    pub status: JudgeStatus,
}

/// The user-facing split of a finished (or best-effort) run: primary output,
/// secondary diagnostic text, and whether the run should be styled as an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub output: String,
    pub warnings: String,
    pub is_error: bool,
}

impl RunOutcome {
    /// Outcome for a run that failed before producing any judge result.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            warnings: String::new(),
            is_error: true,
        }
    }
}

/// An entry of the judge service's language catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Language {
    pub id: u32,
    pub name: String,
}
