// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission orchestration.
//!
//! One submit is one pass through:
//!
//! ```text
//! RATE_CHECK --denied--> RATE_LIMITED
//! RATE_CHECK --allowed--> VALIDATE --fails--> INVALID
//!                                  --passes--> READY_TO_SEND
//! ```
//!
//! The rate check runs before validation, so every submit spends budget
//! whether or not the payload is valid. The guard never performs the relay
//! call itself.

use crate::config::Config;
use crate::events::{self, SecurityEvent, SecurityEventSink, TracingEventSink};
use crate::limiter::{AttemptStore, Clock, InMemoryStore, RateLimitResult, RateLimiter, SystemClock};
use crate::sanitizer::{self, Sanitizer};
use crate::validator::{Field, FieldValidator, SubmissionInput, ValidationVerdict};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Identifier used for the site's single contact form.
pub const CONTACT_FORM_ID: &str = "contact_form";

/// Form fields after sanitization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Outcome of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Too many attempts; try again after `retry_after`
    RateLimited { retry_after: Duration },
    /// At least one field failed validation
    Invalid(ValidationVerdict),
    /// Hand the sanitized submission to the relay
    ReadyToSend(SanitizedSubmission),
}

/// Verdict kind without payload, for counters and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    RateLimited,
    Invalid,
    ReadyToSend,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Invalid => "invalid",
            Self::ReadyToSend => "ready_to_send",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Verdict {
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::RateLimited { .. } => Outcome::RateLimited,
            Self::Invalid(_) => Outcome::Invalid,
            Self::ReadyToSend(_) => Outcome::ReadyToSend,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::ReadyToSend(_))
    }
}

/// Whole minutes to wait, rounded up.
pub fn retry_minutes(retry_after: Duration) -> u64 {
    (retry_after.as_millis() as u64).div_ceil(60_000)
}

/// General message shown for a rate-limited submit.
pub fn retry_message(retry_after: Duration) -> String {
    format!(
        "Too many attempts. Please try again in {} minutes.",
        retry_minutes(retry_after)
    )
}

/// Sanitizer, validator, limiter and event sink wired together.
pub struct SubmissionGuard<S = InMemoryStore, C = SystemClock> {
    sanitizer: Box<dyn Sanitizer>,
    validator: FieldValidator,
    limiter: RateLimiter<S, C>,
    events: Arc<dyn SecurityEventSink>,
}

impl SubmissionGuard {
    /// Build the default guard described by `config`, logging events through tracing.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            sanitizer::from_config(&config.sanitizer),
            FieldValidator::new(config.validation.clone()),
            RateLimiter::new(config.rate_limit.clone()),
            Arc::new(TracingEventSink),
        )
    }
}

impl<S: AttemptStore, C: Clock> SubmissionGuard<S, C> {
    pub fn new(
        sanitizer: Box<dyn Sanitizer>,
        validator: FieldValidator,
        limiter: RateLimiter<S, C>,
        events: Arc<dyn SecurityEventSink>,
    ) -> Self {
        Self {
            sanitizer,
            validator,
            limiter,
            events,
        }
    }

    pub fn limiter(&self) -> &RateLimiter<S, C> {
        &self.limiter
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    /// Normalise a single field value, as on every keystroke.
    pub fn sanitize(&self, raw: &str) -> String {
        self.sanitizer.sanitize(raw)
    }

    pub fn sanitize_input(&self, input: &SubmissionInput) -> SubmissionInput {
        SubmissionInput {
            name: self.sanitize(&input.name),
            email: self.sanitize(&input.email),
            message: self.sanitize(&input.message),
        }
    }

    /// Sanitize, then validate, without touching the rate limiter.
    pub fn validate(&self, input: &SubmissionInput) -> ValidationVerdict {
        self.validator.validate_form(&self.sanitize_input(input))
    }

    /// Run one submit attempt through rate check and validation.
    pub fn submit(&self, identifier: &str, input: &SubmissionInput) -> Verdict {
        self.report_suspicious(input);

        if let RateLimitResult::Limited { retry_after } = self.limiter.check(identifier) {
            info!(identifier, retry_after_secs = retry_after.as_secs(), "Submission rate limited");
            self.events
                .log_security_event(&SecurityEvent::rate_limited(identifier, retry_after));
            return Verdict::RateLimited { retry_after };
        }

        let sanitized = self.sanitize_input(input);
        let verdict = self.validator.validate_form(&sanitized);
        if !verdict.is_passing() {
            info!(identifier, failing = ?verdict.failing_fields(), "Submission failed validation");
            self.events.log_security_event(&SecurityEvent::ValidationFailed {
                fields: verdict.failing_fields(),
            });
            return Verdict::Invalid(verdict);
        }

        debug!(identifier, "Submission ready to send");
        Verdict::ReadyToSend(SanitizedSubmission {
            name: sanitized.name,
            email: sanitized.email,
            message: sanitized.message,
        })
    }

    /// Record a transmission failure reported by the relay collaborator.
    pub fn report_relay_failure(&self, error: &dyn fmt::Display) {
        self.events.log_security_event(&SecurityEvent::RelayFailed {
            error: error.to_string(),
        });
    }

    fn report_suspicious(&self, input: &SubmissionInput) {
        for field in Field::ALL {
            if events::is_suspicious(input.get(field)) {
                self.events
                    .log_security_event(&SecurityEvent::SuspiciousInput { field });
            }
        }
    }
}
