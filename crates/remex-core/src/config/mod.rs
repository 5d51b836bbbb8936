//! Configuration for the runner: judge endpoint, poll cadence, problem API,
//! and storage backing. Loaded from YAML with environment resolution for
//! credentials.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;

use crate::errors::ExecError;
use std::path::Path;

/// Load a configuration from a YAML file.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<RemexConfig, ExecError> {
    ConfigLoader::from_file(path).await
}
