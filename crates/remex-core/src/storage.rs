//! Key-value storage seam for session buffers and credentials.
//!
//! The session controller never touches ambient global state; everything it
//! wants to survive a restart (editor buffers, selected language, the
//! problem-API bearer token) goes through an injected `KeyValueStore`.
//! Keys are namespaced with a `remex-` prefix so a shared backing file can
//! host other tenants.

use crate::errors::ExecError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

const KEY_PREFIX: &str = "remex-";

fn prefixed(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ExecError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ExecError>;
    fn remove(&self, key: &str) -> Result<(), ExecError>;
}

/// Volatile store for tests and one-shot CLI runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ExecError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ExecError::Storage("store lock poisoned".to_string()))?;
        Ok(entries.get(&prefixed(key)).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ExecError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ExecError::Storage("store lock poisoned".to_string()))?;
        entries.insert(prefixed(key), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ExecError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ExecError::Storage("store lock poisoned".to_string()))?;
        entries.remove(&prefixed(key));
        Ok(())
    }
}

/// Store persisted as one JSON document on disk. The whole document is
/// rewritten on every mutation; buffers are small and writes are rare.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ExecError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| ExecError::Storage(format!("failed to read {}: {}", path.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| ExecError::Storage(format!("corrupt store {}: {}", path.display(), e)))?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), ExecError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| ExecError::Storage(format!("failed to serialize store: {}", e)))?;
        fs::write(&self.path, content)
            .map_err(|e| ExecError::Storage(format!("failed to write {}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ExecError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ExecError::Storage("store lock poisoned".to_string()))?;
        Ok(entries.get(&prefixed(key)).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ExecError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ExecError::Storage("store lock poisoned".to_string()))?;
        entries.insert(prefixed(key), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), ExecError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ExecError::Storage("store lock poisoned".to_string()))?;
        entries.remove(&prefixed(key));
        self.flush(&entries)
    }
}
