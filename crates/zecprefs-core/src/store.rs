//! Key-value preference storage.
//!
//! The settings layer only talks to a [`PreferenceStore`], so the medium (memory,
//! JSON file, SQLite) can change without touching validation or formatting code.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// SQLite error.
    #[cfg(feature = "persistence")]
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Stored blob is not valid base64.
    #[error("Encoding error: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// Other storage error.
    #[error("{0}")]
    Other(String),
}

/// A typed preference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Text(String),
}

impl PreferenceValue {
    /// Read as a bool. Text `"true"`/`"false"` converts, anything else does not.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PreferenceValue::Bool(b) => Some(*b),
            PreferenceValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }

    /// Read as text. Bools render as `"true"`/`"false"`.
    pub fn into_text(self) -> String {
        match self {
            PreferenceValue::Bool(b) => b.to_string(),
            PreferenceValue::Text(s) => s,
        }
    }
}

impl From<bool> for PreferenceValue {
    fn from(value: bool) -> Self {
        PreferenceValue::Bool(value)
    }
}

impl From<String> for PreferenceValue {
    fn from(value: String) -> Self {
        PreferenceValue::Text(value)
    }
}

impl From<&str> for PreferenceValue {
    fn from(value: &str) -> Self {
        PreferenceValue::Text(value.to_string())
    }
}

/// Capability interface over a key-value settings backend.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, StoreError>;

    fn set(&mut self, key: &str, value: PreferenceValue) -> Result<(), StoreError>;

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key)?.map(PreferenceValue::into_text))
    }

    /// Read a bool, falling back to `default` when the key is unset or not a bool.
    fn get_bool(&self, key: &str, default: bool) -> Result<bool, StoreError> {
        match self.get(key)? {
            None => Ok(default),
            Some(value) => match value.as_bool() {
                Some(b) => Ok(b),
                None => {
                    tracing::warn!(key, "Stored preference is not a bool, using default");
                    Ok(default)
                }
            },
        }
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set(key, PreferenceValue::from(value))
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set(key, PreferenceValue::from(value))
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: PreferenceValue) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store, for tests and sessions that should not touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, PreferenceValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: PreferenceValue) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
