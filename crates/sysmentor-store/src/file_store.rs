// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed key-value store.
//!
//! The native analogue of browser localStorage: one JSON object per data
//! directory, loaded at open and written through on every mutation. An
//! unreadable or unparseable file loads as an empty map so a damaged store
//! never blocks startup.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use sysmentor_core::{KeyValueStore, SysmentorError};

const STORE_FILE_NAME: &str = "store.json";

/// Durable [`KeyValueStore`] persisted as a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens (or creates) the store under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, SysmentorError> {
        fs::create_dir_all(data_dir).map_err(SysmentorError::storage)?;
        let path = data_dir.join(STORE_FILE_NAME);

        let map = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "corrupt store file, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(SysmentorError::storage(e)),
        };

        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn flush(&self, map: &HashMap<String, String>) -> Result<(), SysmentorError> {
        let raw = serde_json::to_string_pretty(map).map_err(SysmentorError::storage)?;
        fs::write(&self.path, raw).map_err(SysmentorError::storage)
    }

    fn lock_map(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, SysmentorError> {
        self.map
            .lock()
            .map_err(|_| SysmentorError::Internal("store mutex poisoned".into()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SysmentorError> {
        Ok(self.lock_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SysmentorError> {
        let mut map = self.lock_map()?;
        map.insert(key.to_string(), value.to_string());
        self.flush(&map)
    }

    fn remove(&self, key: &str) -> Result<(), SysmentorError> {
        let mut map = self.lock_map()?;
        map.remove(key);
        self.flush(&map)
    }
}
