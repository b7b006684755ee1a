// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token provider for outbound requests.

/// Supplies the bearer token attached to chat backend requests.
///
/// Token issuance and refresh belong to the backend and the auth UI; the
/// resilience layer only reads whatever token is currently available.
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token, if the user is authenticated.
    fn bearer_token(&self) -> Option<String>;
}

/// Provider for unauthenticated sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl TokenProvider for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}
