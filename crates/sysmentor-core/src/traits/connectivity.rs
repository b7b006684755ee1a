// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connectivity signal consulted before attempting delivery.

/// Lightweight online/offline indicator (browser `navigator.onLine` analogue).
///
/// When the probe reports offline, the delivery client skips network attempts
/// entirely and goes straight to the queue-and-fallback path.
pub trait ConnectivityProbe: Send + Sync {
    /// Returns true when the network is believed reachable.
    fn is_online(&self) -> bool;
}

/// Default probe that always reports online.
///
/// Outside a browser there is no cheap authoritative signal, so the native
/// client assumes connectivity and lets the request itself fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

impl ConnectivityProbe for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}
