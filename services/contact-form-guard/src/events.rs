// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Security event reporting.
//!
//! The guard reports noteworthy events through an injected
//! [`SecurityEventSink`]. Sinks are fire-and-forget: they return nothing
//! and must not panic, and the guard's verdict never depends on them.

use crate::validator::Field;
use parking_lot::Mutex;
use regex::RegexSet;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

static SUSPICIOUS_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)\bon\w+\s*=",
        r"(?i)<iframe",
        r"(?i)eval\(",
        r"(?i)document\.write",
    ])
    .expect("valid regex set")
});

/// Something the guard wants on record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SecurityEvent {
    /// Submit attempt rejected by the rate limiter
    RateLimitExceeded {
        identifier: String,
        retry_after_ms: u64,
    },
    /// Submit attempt rejected by field validation
    ValidationFailed { fields: Vec<Field> },
    /// Raw input carried script-like content before sanitization
    SuspiciousInput { field: Field },
    /// The relay endpoint could not be reached or refused the message
    RelayFailed { error: String },
}

impl SecurityEvent {
    pub fn rate_limited(identifier: &str, retry_after: Duration) -> Self {
        Self::RateLimitExceeded {
            identifier: identifier.to_string(),
            retry_after_ms: retry_after.as_millis() as u64,
        }
    }

    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded { .. } => "rate_limit_exceeded",
            Self::ValidationFailed { .. } => "validation_failed",
            Self::SuspiciousInput { .. } => "suspicious_input",
            Self::RelayFailed { .. } => "relay_failed",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimitExceeded {
                identifier,
                retry_after_ms,
            } => write!(
                f,
                "Rate limit exceeded for {identifier} (retry in {retry_after_ms} ms)"
            ),
            Self::ValidationFailed { fields } => {
                let names: Vec<String> = fields.iter().map(ToString::to_string).collect();
                write!(f, "Form validation failed: {}", names.join(", "))
            }
            Self::SuspiciousInput { field } => write!(f, "Suspicious content in {field}"),
            Self::RelayFailed { error } => write!(f, "Form submission failed: {error}"),
        }
    }
}

/// Receiver for security events.
pub trait SecurityEventSink: Send + Sync {
    fn log_security_event(&self, event: &SecurityEvent);
}

/// Emits events as `warn!` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl SecurityEventSink for TracingEventSink {
    fn log_security_event(&self, event: &SecurityEvent) {
        warn!(event = event.name(), details = %event, "Security event");
    }
}

/// Keeps every event in memory, for assertions.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SecurityEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(SecurityEvent::name).collect()
    }
}

impl SecurityEventSink for RecordingEventSink {
    fn log_security_event(&self, event: &SecurityEvent) {
        self.events.lock().push(event.clone());
    }
}

/// True when raw input looks like an injection attempt.
pub fn is_suspicious(raw: &str) -> bool {
    SUSPICIOUS_PATTERNS.is_match(raw)
}
