//! Client for the problem-catalog API.
//!
//! The catalog lives behind a separate CRUD service; the runner only ever
//! reads a single problem's title and description for display next to the
//! editor. Authentication is a bearer token the caller retrieves from
//! storage; registration and login flows are out of scope here.

use crate::errors::ExecError;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Storage key under which the problem-API bearer token is kept.
pub const KEY_AUTH_TOKEN: &str = "auth-token";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Problem {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ProblemClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ProblemClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    pub async fn fetch_problem(&self, id: &str) -> Result<Problem, ExecError> {
        let url = format!("{}/api/problems/{}", self.base_url, id);
        log::debug!("fetching problem {}", url);

        let mut builder = self.client.get(&url).timeout(DEFAULT_REQUEST_TIMEOUT);
        if let Some(token) = &self.bearer_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExecError::Problem(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExecError::Problem(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ExecError::Problem(format!(
                "service returned status {}: {}",
                status, text
            )));
        }

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ExecError::Problem(format!("invalid JSON response: {}", e)))?;

        // The API signals failures as 200s with an `error` field.
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return Err(ExecError::Problem(message.to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| ExecError::Problem(format!("unexpected problem shape: {}", e)))
    }
}
