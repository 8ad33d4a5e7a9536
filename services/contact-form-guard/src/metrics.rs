// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for guard decisions.

use crate::guard::Outcome;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Metrics output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub struct GuardMetrics {
    registry: Registry,
    verdicts: IntCounterVec,
    sanitized: IntCounter,
}

impl GuardMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let verdicts = IntCounterVec::new(
            Opts::new(
                "contact_guard_verdicts_total",
                "Submit attempts by guard outcome",
            ),
            &["outcome"],
        )?;
        let sanitized = IntCounter::new(
            "contact_guard_sanitize_requests_total",
            "Field values passed through the sanitizer",
        )?;

        registry.register(Box::new(verdicts.clone()))?;
        registry.register(Box::new(sanitized.clone()))?;

        Ok(Self {
            registry,
            verdicts,
            sanitized,
        })
    }

    pub fn record_verdict(&self, outcome: Outcome) {
        self.verdicts.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn record_sanitize(&self) {
        self.sanitized.inc();
    }

    pub fn verdict_count(&self, outcome: Outcome) -> u64 {
        self.verdicts.with_label_values(&[outcome.as_str()]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
