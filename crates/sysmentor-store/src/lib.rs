// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable stores for the SysMentor client.
//!
//! Two stores share one [`KeyValueStore`](sysmentor_core::KeyValueStore)
//! backend: the outbound message queue that survives restarts, and the
//! TTL-governed response cache. Both treat corrupt or missing persisted data
//! as empty rather than failing their callers.

pub mod cache;
pub mod file_store;
pub mod queue;

pub use cache::{ResourceClass, ResponseCache, cache_key};
pub use file_store::JsonFileStore;
pub use queue::MessageQueue;
