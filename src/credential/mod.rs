//! Durable storage for the bearer credential.
//!
//! The request layer only needs get/set/remove by key, so storage is a small
//! trait: [`FileCredentialStore`] keeps one file per key, and
//! [`MemoryCredentialStore`] keeps values for the lifetime of the process.

mod file;

pub use file::FileCredentialStore;

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Fixed key under which the bearer token is stored.
pub const CREDENTIAL_KEY: &str = "token";

#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token` under [`CREDENTIAL_KEY`].
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(CREDENTIAL_KEY.to_string(), token.into());
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
