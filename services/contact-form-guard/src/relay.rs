// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client for the third-party form relay.
//!
//! Only ever called with a [`SanitizedSubmission`], i.e. after the guard
//! returned `ReadyToSend`. A non-2xx response is a transmission failure,
//! distinct from validation and rate limiting. No retries.

use crate::config::RelayConfig;
use crate::guard::SanitizedSubmission;
use reqwest::header::ACCEPT;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Relay unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay rejected submission: HTTP {status}")]
    Rejected { status: u16 },
}

/// JSON body accepted by Formspree-style relays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "_subject")]
    pub subject: String,
    #[serde(rename = "_replyto")]
    pub reply_to: String,
}

impl RelayPayload {
    pub fn new(submission: &SanitizedSubmission, subject: &str) -> Self {
        Self {
            name: submission.name.clone(),
            email: submission.email.clone(),
            message: submission.message.clone(),
            subject: subject.to_string(),
            reply_to: submission.email.clone(),
        }
    }
}

pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
    subject: String,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            subject: config.subject.clone(),
        })
    }

    pub fn payload(&self, submission: &SanitizedSubmission) -> RelayPayload {
        RelayPayload::new(submission, &self.subject)
    }

    /// POST the submission to the relay endpoint.
    pub async fn send(&self, submission: &SanitizedSubmission) -> Result<(), RelayError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&self.payload(submission))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(endpoint = %self.endpoint, "Message relayed");
            Ok(())
        } else {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Relay rejected message");
            Err(RelayError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}
