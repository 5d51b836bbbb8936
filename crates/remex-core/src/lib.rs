//! Client library for remote code-execution ("judge") services.
//!
//! remex drives the full submit-and-poll flow against a Judge0-style judge:
//! source code and stdin go out, an opaque token comes back, and the token
//! is polled on a bounded schedule until the judge reports a terminal
//! status. The finished (or best-effort) result is classified into primary
//! output, warnings, and an error flag for presentation.
//!
//! # Architecture Overview
//!
//! - **Judge clients**: the `JudgeClient` trait and the Judge0 wire
//!   implementation, including RapidAPI header auth and base64 transport
//! - **Submission polling**: a bounded, strictly sequential poll loop with
//!   an explicit exit condition
//! - **Execution sessions**: run lifecycle, stale-run discarding, and the
//!   deterministic output classification rule
//! - **Language catalog**: filtering, defaults, and per-language starter
//!   snippets keyed by normalized language kind
//! - **Storage seam**: injected key-value stores backing editor buffers and
//!   credentials
//! - **Configuration**: YAML config with environment-resolved credentials

pub mod config;
pub mod core_types;
pub mod errors;
pub mod judge;
pub mod languages;
pub mod poller;
pub mod problems;
pub mod session;
pub mod storage;

pub use config::{load_config, ConfigLoader, RemexConfig};
pub use core_types::{
    JudgeResult, JudgeStatus, Language, RunOutcome, SubmissionRequest, SubmissionToken,
};
pub use errors::ExecError;
pub use judge::{Judge0Client, JudgeClient};
pub use poller::{poll_submission, PollPolicy};
pub use problems::{Problem, ProblemClient};
pub use session::{classify, ExecutionSession, RunTicket};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

#[cfg(test)]
pub mod test_utils;
