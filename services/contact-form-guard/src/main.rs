// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Guard Service
//!
//! Exposes the guard's decisions to the portfolio front end:
//!
//! - `POST /sanitize`: normalise a field value
//! - `POST /check`: rate check, then validate, a submission
//! - `GET /health`, `GET /metrics`
//!
//! The service never contacts the relay itself; the front end posts the
//! returned payload when the outcome is `ready_to_send`.
//!
//! ## Configuration
//!
//! - `BIND_ADDR`: Server bind address (default: 127.0.0.1:8080)
//! - `MAX_ATTEMPTS`: Submit attempts per window (default: 3)
//! - `WINDOW_MS`: Window length in milliseconds (default: 600000)
//! - `SANITIZER_MODE`: `rich` or `basic` (default: rich)
//! - `RELAY_ENDPOINT`, `RELAY_TIMEOUT_MS`, `STATUS_DISPLAY_MS`, `METRICS_ENABLED`

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_form_guard::{
    config::Config,
    handlers::{router, AppState},
    metrics::GuardMetrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_attempts = config.rate_limit.max_attempts,
        window_ms = config.rate_limit.window_ms,
        sanitizer = ?config.sanitizer.mode,
        "Starting contact form guard"
    );

    let metrics = if config.metrics.enabled {
        Some(GuardMetrics::new()?)
    } else {
        None
    };
    let state = Arc::new(AppState::new(config.clone(), metrics));

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.guard.limiter().purge_expired();
        }
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
