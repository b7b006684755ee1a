// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key-value stores for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use sysmentor_core::{KeyValueStore, SysmentorError};

/// Plain in-memory [`KeyValueStore`].
///
/// `seed` lets tests inject raw (including deliberately corrupt) values.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key with a raw string value.
    pub fn seed(&self, key: &str, value: &str) {
        self.lock_map().insert(key.to_string(), value.to_string());
    }

    /// Returns the raw stored value for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock_map().get(key).cloned()
    }

    fn lock_map(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SysmentorError> {
        Ok(self.lock_map().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SysmentorError> {
        self.lock_map().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SysmentorError> {
        self.lock_map().remove(key);
        Ok(())
    }
}

/// Store whose writes always fail, for exercising best-effort paths.
///
/// Reads succeed (empty), so callers observe "storage present but full".
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, SysmentorError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), SysmentorError> {
        Err(SysmentorError::storage(std::io::Error::other(
            "simulated write failure",
        )))
    }

    fn remove(&self, _key: &str) -> Result<(), SysmentorError> {
        Err(SysmentorError::storage(std::io::Error::other(
            "simulated remove failure",
        )))
    }
}
