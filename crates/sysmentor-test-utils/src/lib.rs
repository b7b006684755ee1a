// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic test doubles for the SysMentor client seams.
//!
//! Everything here implements a `sysmentor-core` trait with fully
//! controllable behavior: an in-memory store, a manually advanced clock, a
//! fixed connectivity signal, and a scripted transport.

pub mod clock;
pub mod connectivity;
pub mod store;
pub mod transport;

pub use clock::ManualClock;
pub use connectivity::StaticConnectivity;
pub use store::{FailingStore, MemoryStore};
pub use transport::MockTransport;

use sysmentor_core::TokenProvider;

/// Token provider returning a fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
