// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery layer for the SysMentor chat backend.
//!
//! [`DeliveryClient`] performs the network call with a fixed retry policy and
//! never fails its caller: when the backend is unreachable it parks the
//! message in the persistent queue and synthesizes an offline placeholder.
//! [`QueueProcessor`] later drains that queue in bounded FIFO passes,
//! piggybacking on successful network activity.

pub mod delivery;
pub mod fallback;
pub mod processor;

pub use delivery::{DeliveryClient, DeliveryPolicy, SendOutcome};
pub use processor::{DrainReport, QueueProcessor};
