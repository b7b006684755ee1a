// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the SysMentor client.
//!
//! This crate provides the error type, domain and wire types, and the seam
//! traits used throughout the workspace. The store, client, render, and chat
//! crates all build on the definitions here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SysmentorError;
pub use traits::{Clock, ConnectivityProbe, KeyValueStore, SystemClock, TokenProvider, Transport};
pub use types::{
    ChatMessage, ChatRequest, ChatbotResponse, Matricula, MessageId, QueuedMessage, RequestKind,
    Role, SessionId,
};
