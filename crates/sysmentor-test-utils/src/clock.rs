// SPDX-FileCopyrightText: 2026 SysMentor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manually advanced clock for TTL and timestamp tests.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sysmentor_core::Clock;

/// A [`Clock`] that only moves when the test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Starts at a fixed, arbitrary instant.
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()),
        }
    }

    /// Starts at the given unix-millisecond instant.
    pub fn at_millis(millis: i64) -> Self {
        Self {
            now: Mutex::new(
                Utc.timestamp_millis_opt(millis)
                    .single()
                    .expect("valid millis"),
            ),
        }
    }

    /// Advances the clock by `millis` milliseconds.
    pub fn advance_millis(&self, millis: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::milliseconds(millis);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
