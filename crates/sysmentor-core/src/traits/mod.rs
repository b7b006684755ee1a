// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits for the SysMentor client.
//!
//! These are the injection points the resilience layer depends on: durable
//! storage, wall-clock time, connectivity, and the bearer-token provider.
//! Production wires real implementations; tests inject deterministic fakes.

pub mod auth;
pub mod clock;
pub mod connectivity;
pub mod storage;
pub mod transport;

pub use auth::TokenProvider;
pub use clock::{Clock, SystemClock};
pub use connectivity::ConnectivityProbe;
pub use storage::KeyValueStore;
pub use transport::Transport;
