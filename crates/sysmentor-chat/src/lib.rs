// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for the SysMentor client.
//!
//! [`ChatService`] ties the pipeline together: it keeps the ordered
//! conversation, delivers outbound messages through the resilient
//! [`DeliveryClient`], piggybacks a queue drain on every successful network
//! call, and animates assistant replies through a [`Typewriter`]. The service
//! itself is the [`RenderSink`], so every revealed prefix lands in the
//! conversation's `displayed_prefix` in place.

mod service;

pub use service::{ChatService, ChatTurn};
