// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.

use contact_form_guard::config::RateLimitConfig;
use contact_form_guard::validator::SubmissionInput;

use super::generators;

/// What each simulated submit carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Valid,
    Xss,
    Empty,
    Oversized,
}

impl PayloadKind {
    pub fn submission(self, i: usize) -> SubmissionInput {
        match self {
            Self::Valid => generators::valid_submission(i),
            Self::Xss => generators::xss_submission(i),
            Self::Empty => generators::empty_submission(),
            Self::Oversized => generators::oversized_submission(),
        }
    }

    /// Whether the payload can pass validation at all.
    pub fn passes_validation(self) -> bool {
        matches!(self, Self::Valid | Self::Xss)
    }
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submit attempts
    pub total_attempts: usize,
    /// Simulated time between consecutive attempts
    pub interval_ms: u64,
    /// Number of distinct identifiers, used round-robin
    pub unique_clients: usize,
    pub payload: PayloadKind,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_attempts: 100,
            interval_ms: 1_000,
            unique_clients: 1,
            payload: PayloadKind::Valid,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One client hammering the submit button.
    pub fn single_client_flood() -> Self {
        Self {
            total_attempts: 200,
            interval_ms: 500,
            ..Default::default()
        }
    }

    /// Many clients, each sending a handful of messages.
    pub fn distributed_flood() -> Self {
        Self {
            total_attempts: 500,
            interval_ms: 100,
            unique_clients: 50,
            ..Default::default()
        }
    }

    /// Injection payloads from clients that never hit the limit.
    pub fn xss_spray() -> Self {
        Self {
            total_attempts: 60,
            interval_ms: 1_000,
            unique_clients: 60,
            payload: PayloadKind::Xss,
        }
    }

    /// Blank form spam from a single client.
    pub fn empty_spam() -> Self {
        Self {
            total_attempts: 50,
            payload: PayloadKind::Empty,
            ..Default::default()
        }
    }

    /// Oversized messages from a few clients.
    pub fn oversized_spam() -> Self {
        Self {
            total_attempts: 30,
            unique_clients: 3,
            payload: PayloadKind::Oversized,
            ..Default::default()
        }
    }

    /// One attempt every three and a half minutes, under the default cap.
    pub fn slow_drip() -> Self {
        Self {
            total_attempts: 20,
            interval_ms: 210_000,
            ..Default::default()
        }
    }

    /// Simulated span from the first attempt to the last.
    pub fn span_ms(&self) -> u64 {
        self.interval_ms * self.total_attempts.saturating_sub(1) as u64
    }
}

/// Expected outcomes for an attack pattern.
pub struct AttackExpectations {
    /// Upper bound on attempts that reach `ready_to_send`
    pub max_ready: usize,
    /// Description of expected behavior
    pub description: &'static str,
}

impl AttackConfig {
    /// Get expected outcomes for this attack pattern under `rate`.
    pub fn expectations(&self, rate: &RateLimitConfig) -> AttackExpectations {
        if !self.payload.passes_validation() {
            return AttackExpectations {
                max_ready: 0,
                description: "Every attempt should fail validation or the rate check",
            };
        }

        let per_client = self.total_attempts.div_ceil(self.unique_clients);
        let client_span = self.interval_ms * self.unique_clients as u64 * (per_client as u64 - 1);
        let windows = (client_span / rate.window_ms + 1) as usize;
        let bound = per_client.min(rate.max_attempts as usize * windows);

        AttackExpectations {
            max_ready: bound * self.unique_clients,
            description: "Each client capped at max_attempts per window",
        }
    }
}
