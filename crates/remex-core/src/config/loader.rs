//! YAML configuration loading and environment resolution.

use crate::config::types::RemexConfig;
use crate::errors::ExecError;
use std::env;
use std::path::Path;
use tokio::fs;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<RemexConfig, ExecError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            ExecError::Config(format!("failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Load configuration from a YAML string.
    pub fn from_str(content: &str) -> Result<RemexConfig, ExecError> {
        let mut config: RemexConfig = serde_yaml::from_str(content)
            .map_err(|e| ExecError::Config(format!("failed to parse YAML config: {}", e)))?;
        Self::resolve_environment(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Pull the API key from the configured environment variable when the
    /// config file does not carry it inline.
    fn resolve_environment(config: &mut RemexConfig) {
        if config.judge.api_key.is_none() {
            if let Some(var) = &config.judge.api_key_env {
                match env::var(var) {
                    Ok(value) => config.judge.api_key = Some(value),
                    Err(_) => log::warn!("api_key_env {} is not set, continuing without a key", var),
                }
            }
        }
    }
}
