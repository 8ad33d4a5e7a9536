// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact form guard service.
//!
//! The front end calls `/check` on submit and only posts to the relay when
//! the outcome is `ready_to_send`, using the returned payload as-is.

use crate::config::Config;
use crate::guard::{retry_message, Outcome, SubmissionGuard, Verdict, CONTACT_FORM_ID};
use crate::metrics::GuardMetrics;
use crate::relay::RelayPayload;
use crate::validator::{SubmissionInput, ValidationVerdict};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub guard: SubmissionGuard,
    pub metrics: Option<GuardMetrics>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, metrics: Option<GuardMetrics>) -> Self {
        Self {
            guard: SubmissionGuard::from_config(&config),
            metrics,
            config,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SanitizeResponse {
    pub value: String,
}

/// Submit check response.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<RelayPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/sanitize", post(sanitize))
        .route("/check", post(check));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics));
    }

    router.with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-form-guard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Normalise one field value.
pub async fn sanitize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SanitizeRequest>,
) -> Json<SanitizeResponse> {
    if let Some(metrics) = &state.metrics {
        metrics.record_sanitize();
    }
    Json(SanitizeResponse {
        value: state.guard.sanitize(&req.value),
    })
}

/// Run one submit attempt through the guard.
///
/// Every attempt counts against the single contact form budget; nothing in
/// the request body selects the limiter key.
pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SubmissionInput>,
) -> Response {
    debug!("Processing submission check");

    let verdict = state.guard.submit(CONTACT_FORM_ID, &input);
    if let Some(metrics) = &state.metrics {
        metrics.record_verdict(verdict.outcome());
    }

    match verdict {
        Verdict::ReadyToSend(submission) => (
            StatusCode::OK,
            Json(CheckResponse {
                outcome: Outcome::ReadyToSend,
                payload: Some(RelayPayload::new(&submission, &state.config.relay.subject)),
                errors: None,
                retry_after_secs: None,
                message: None,
            }),
        )
            .into_response(),
        Verdict::Invalid(errors) => (
            StatusCode::OK,
            Json(CheckResponse {
                outcome: Outcome::Invalid,
                payload: None,
                errors: Some(errors),
                retry_after_secs: None,
                message: None,
            }),
        )
            .into_response(),
        Verdict::RateLimited { retry_after } => {
            let retry_secs = retry_after.as_millis().div_ceil(1000) as u64;
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_secs.to_string())],
                Json(CheckResponse {
                    outcome: Outcome::RateLimited,
                    payload: None,
                    errors: None,
                    retry_after_secs: Some(retry_secs),
                    message: Some(retry_message(retry_after)),
                }),
            )
                .into_response()
        }
    }
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let Some(metrics) = &state.metrics else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
