//! Judge0-protocol client.
//!
//! Speaks the Judge0 REST surface: `POST /submissions` to queue a run,
//! `GET /submissions/{token}` to read its state, `GET /languages` for the
//! catalog. Hosted Judge0 deployments front the API with RapidAPI-style
//! header authentication, and can carry output channels base64-encoded
//! depending on a per-request query flag; both knobs are supported here.

use crate::core_types::{JudgeResult, JudgeStatus, Language, SubmissionRequest, SubmissionToken};
use crate::errors::ExecError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Judge0Client {
    client: Client,
    base_url: String,
    api_host: Option<String>,
    api_key: Option<String>,
    base64_io: bool,
    request_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    stdout: Option<String>,
    #[serde(default)]
    stderr: Option<String>,
    #[serde(default)]
    compile_output: Option<String>,
    status: JudgeStatus,
}

impl Judge0Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_host: None,
            api_key: None,
            base64_io: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// RapidAPI-style header pair sent with every request.
    pub fn with_api_key(mut self, host: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self.api_key = Some(key.into());
        self
    }

    /// Encode source/stdin on submit and decode output channels on fetch.
    pub fn with_base64_io(mut self, enabled: bool) -> Self {
        self.base64_io = enabled;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut builder = builder.timeout(self.request_timeout);
        if let Some(host) = &self.api_host {
            builder = builder.header("x-rapidapi-host", host);
        }
        if let Some(key) = &self.api_key {
            builder = builder.header("x-rapidapi-key", key);
        }
        builder
    }

    fn encode_field(&self, value: &str) -> String {
        if self.base64_io {
            BASE64.encode(value)
        } else {
            value.to_string()
        }
    }

    fn decode_field(&self, value: Option<String>) -> Result<String, ExecError> {
        let Some(value) = value else {
            return Ok(String::new());
        };
        if !self.base64_io {
            return Ok(value);
        }
        // Judge0 wraps base64 payloads with newlines.
        let compact: String = value.split_whitespace().collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| ExecError::Fetch(format!("invalid base64 in response field: {}", e)))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait]
impl crate::judge::JudgeClient for Judge0Client {
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionToken, ExecError> {
        let url = format!(
            "{}/submissions?base64_encoded={}&wait=false",
            self.base_url, self.base64_io
        );
        let body = json!({
            "source_code": self.encode_field(&request.source_code),
            "language_id": request.language_id,
            "stdin": self.encode_field(&request.stdin),
        });

        log::debug!("judge submit to {} (language {})", url, request.language_id);

        let response = self
            .request(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ExecError::Submit(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExecError::Submit(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let err = ExecError::Submit(format!("service returned status {}: {}", status, text));
            log::error!("{}", err);
            return Err(err);
        }

        let parsed: SubmitResponse = serde_json::from_str(&text)
            .map_err(|e| ExecError::Submit(format!("invalid JSON response: {}", e)))?;
        let token = parsed
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ExecError::Submit("no token in response".to_string()))?;

        log::debug!("submission accepted, token {}", token);
        Ok(SubmissionToken::new(token))
    }

    async fn fetch_status(&self, token: &SubmissionToken) -> Result<JudgeResult, ExecError> {
        let url = format!(
            "{}/submissions/{}?base64_encoded={}",
            self.base_url, token, self.base64_io
        );

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ExecError::Fetch(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExecError::Fetch(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let err = ExecError::Fetch(format!("service returned status {}: {}", status, text));
            log::error!("{}", err);
            return Err(err);
        }

        let parsed: StatusResponse = serde_json::from_str(&text)
            .map_err(|e| ExecError::Fetch(format!("invalid JSON response: {}", e)))?;

        log::debug!(
            "submission {} status {} ({})",
            token,
            parsed.status.id,
            parsed.status.description
        );

        Ok(JudgeResult {
            stdout: self.decode_field(parsed.stdout)?,
            stderr: self.decode_field(parsed.stderr)?,
            compile_output: self.decode_field(parsed.compile_output)?,
            status: parsed.status,
        })
    }

    async fn languages(&self) -> Result<Vec<Language>, ExecError> {
        let url = format!("{}/languages", self.base_url);

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ExecError::Fetch(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = ExecError::Fetch(format!("service returned status {}: {}", status, text));
            log::error!("{}", err);
            return Err(err);
        }

        response
            .json::<Vec<Language>>()
            .await
            .map_err(|e| ExecError::Fetch(format!("invalid language catalog: {}", e)))
    }
}
