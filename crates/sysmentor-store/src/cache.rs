// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL-governed cache of prior request results.
//!
//! Catalog data (semesters, subjects, topics) changes slowly and is cached
//! aggressively; user progress must stay near-real-time, hence its short
//! TTL. Expiry is lazy: entries are checked on read and never swept.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sysmentor_core::{Clock, KeyValueStore};

/// Resource classes with their cache lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Semester reference data.
    Semesters,
    /// Subject catalog data.
    Subjects,
    /// Weekly topic data.
    Topics,
    /// Learning resources and other content (default class).
    Resources,
    /// Per-student progress data.
    Progress,
}

impl ResourceClass {
    /// Maps an endpoint path to its resource class.
    pub fn from_endpoint(endpoint: &str) -> Self {
        if endpoint.contains("/semestres") {
            Self::Semesters
        } else if endpoint.contains("/materias") {
            Self::Subjects
        } else if endpoint.contains("/semanas-temas") {
            Self::Topics
        } else if endpoint.contains("/progresos") {
            Self::Progress
        } else {
            Self::Resources
        }
    }

    /// Maximum age before an entry of this class is stale.
    pub fn ttl(&self) -> Duration {
        match self {
            Self::Semesters => Duration::from_secs(24 * 60 * 60),
            Self::Subjects => Duration::from_secs(12 * 60 * 60),
            Self::Topics => Duration::from_secs(6 * 60 * 60),
            Self::Resources => Duration::from_secs(3 * 60 * 60),
            Self::Progress => Duration::from_secs(5 * 60),
        }
    }
}

/// Derives the storage key for an endpoint and its query parameters.
///
/// Parameters are sorted by key name before concatenation so parameter order
/// never fragments the cache.
pub fn cache_key(endpoint: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return format!("cache_{endpoint}");
    }

    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    let params_string = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("cache_{endpoint}_{params_string}")
}

/// A cached payload with its storage timestamp (unix milliseconds).
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: serde_json::Value,
    timestamp: i64,
}

/// Read-through cache over a [`KeyValueStore`].
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the cached payload for `endpoint` + `params`, or `None` when
    /// no entry exists, the entry is corrupt, or its TTL has elapsed.
    ///
    /// Expired entries are left in place; reclamation is best-effort and out
    /// of scope here.
    pub fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Option<serde_json::Value> {
        let key = cache_key(endpoint, params);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, key = %key, "cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, key = %key, "corrupt cache entry, treating as miss");
                return None;
            }
        };

        let ttl_millis = ResourceClass::from_endpoint(endpoint).ttl().as_millis() as i64;
        let age = self.clock.now_millis() - entry.timestamp;
        if age >= ttl_millis {
            debug!(key = %key, age_ms = age, "cache entry expired");
            return None;
        }

        Some(entry.data)
    }

    /// Stores `payload` for `endpoint` + `params`, replacing any prior entry.
    pub fn put(&self, endpoint: &str, params: &[(&str, &str)], payload: serde_json::Value) {
        let key = cache_key(endpoint, params);
        let entry = CacheEntry {
            data: payload,
            timestamp: self.clock.now_millis(),
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.store.set(&key, &raw) {
                    warn!(error = %e, key = %key, "cache write failed");
                }
            }
            Err(e) => warn!(error = %e, key = %key, "cache entry serialization failed"),
        }
    }
}
