// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value storage trait (browser localStorage analogue).

use crate::error::SysmentorError;

/// String-keyed, string-valued, synchronous durable storage.
///
/// The queue and cache stores persist JSON blobs through this trait. The
/// capacity ceiling of the underlying store is not managed here; writes are
/// best-effort and callers decide how to degrade when one fails.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, SysmentorError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SysmentorError>;

    /// Removes the value stored under `key`, if any.
    fn remove(&self, key: &str) -> Result<(), SysmentorError>;
}
