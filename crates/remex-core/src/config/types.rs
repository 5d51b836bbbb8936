//! Configuration type definitions.
//!
//! Optional sections default sensibly so a minimal config is just the judge
//! base URL; credentials can live in the file or be pulled from an
//! environment variable at load time.

use crate::errors::ExecError;
use crate::judge::Judge0Client;
use crate::poller::PollPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemexConfig {
    pub judge: JudgeConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub problems: Option<ProblemsConfig>,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_host: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base64_io: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl PollConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            max_attempts: self.max_attempts,
            interval: Duration::from_millis(self.interval_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemsConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Path of the JSON store file; in-memory storage when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_max_attempts() -> usize {
    20
}

fn default_interval_ms() -> u64 {
    700
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl RemexConfig {
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.judge.base_url.trim().is_empty() {
            return Err(ExecError::Config("judge.base_url must be set".to_string()));
        }
        if !self.judge.base_url.starts_with("http://") && !self.judge.base_url.starts_with("https://")
        {
            return Err(ExecError::Config(format!(
                "judge.base_url must be an http(s) URL, got {:?}",
                self.judge.base_url
            )));
        }
        if self.poll.max_attempts == 0 {
            return Err(ExecError::Config("poll.max_attempts must be at least 1".to_string()));
        }
        if let Some(problems) = &self.problems {
            if problems.base_url.trim().is_empty() {
                return Err(ExecError::Config("problems.base_url must be set".to_string()));
            }
        }
        Ok(())
    }

    /// Build a judge client from this configuration.
    pub fn judge_client(&self) -> Judge0Client {
        let mut client = Judge0Client::new(&self.judge.base_url)
            .with_base64_io(self.judge.base64_io)
            .with_request_timeout(Duration::from_secs(self.judge.request_timeout_secs));
        if let (Some(host), Some(key)) = (&self.judge.api_host, &self.judge.api_key) {
            client = client.with_api_key(host, key);
        }
        client
    }
}
