// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form guard.
//!
//! Defaults mirror the limits enforced by the portfolio contact form:
//! three submit attempts per ten minutes, names of 2-50 characters,
//! messages of 10-1000 characters.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown sanitizer mode: {0} (expected \"rich\" or \"basic\")")]
    UnknownSanitizerMode(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Configuration for the contact form guard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Field validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Sanitizer selection
    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    /// Relay endpoint configuration
    #[serde(default)]
    pub relay: RelayConfig,

    /// Form status display configuration
    #[serde(default)]
    pub status: StatusConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding-window limits for submit attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum attempts per identifier inside the window (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Trailing window length in milliseconds (default: 600000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

/// Per-field acceptance limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_name_min")]
    pub name_min_chars: usize,

    #[serde(default = "default_name_max")]
    pub name_max_chars: usize,

    /// Maximum total email length (default: 254)
    #[serde(default = "default_email_max")]
    pub email_max_len: usize,

    #[serde(default = "default_message_min")]
    pub message_min_chars: usize,

    #[serde(default = "default_message_max")]
    pub message_max_chars: usize,
}

/// Which sanitizer strategy to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SanitizerMode {
    /// Element-aware stripping (drops script/style bodies)
    #[default]
    Rich,
    /// Regex tag stripping only
    Basic,
}

impl FromStr for SanitizerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rich" => Ok(Self::Rich),
            "basic" => Ok(Self::Basic),
            other => Err(ConfigError::UnknownSanitizerMode(other.to_string())),
        }
    }
}

/// Sanitizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SanitizerConfig {
    #[serde(default)]
    pub mode: SanitizerMode,
}

/// Relay endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Form relay URL
    #[serde(default = "default_relay_endpoint")]
    pub endpoint: String,

    /// `_subject` sent with every message
    #[serde(default = "default_relay_subject")]
    pub subject: String,

    /// Request timeout in milliseconds (default: 10000)
    #[serde(default = "default_relay_timeout_ms")]
    pub timeout_ms: u64,
}

/// Form status display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// How long a status notice stays visible (default: 5000)
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_window_ms() -> u64 {
    10 * 60 * 1000
}

fn default_name_min() -> usize {
    2
}

fn default_name_max() -> usize {
    50
}

fn default_email_max() -> usize {
    254
}

fn default_message_min() -> usize {
    10
}

fn default_message_max() -> usize {
    1000
}

fn default_relay_endpoint() -> String {
    "https://formspree.io/f/mwpognoa".to_string()
}

fn default_relay_subject() -> String {
    "New Portfolio Contact Form Submission".to_string()
}

fn default_relay_timeout_ms() -> u64 {
    10_000
}

fn default_display_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            sanitizer: SanitizerConfig::default(),
            relay: RelayConfig::default(),
            status: StatusConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_ms: default_window_ms(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min_chars: default_name_min(),
            name_max_chars: default_name_max(),
            email_max_len: default_email_max(),
            message_min_chars: default_message_min(),
            message_max_chars: default_message_max(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_relay_endpoint(),
            subject: default_relay_subject(),
            timeout_ms: default_relay_timeout_ms(),
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl StatusConfig {
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable numeric values fall back to their defaults.
    /// An unknown `SANITIZER_MODE` is rejected rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sanitizer_mode = match lookup("SANITIZER_MODE") {
            Some(raw) => raw.parse()?,
            None => SanitizerMode::default(),
        };

        let rate_limit = RateLimitConfig {
            max_attempts: parse_var(&lookup, "MAX_ATTEMPTS").unwrap_or_else(default_max_attempts),
            window_ms: parse_var(&lookup, "WINDOW_MS").unwrap_or_else(default_window_ms),
        };
        if rate_limit.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_ATTEMPTS",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(default_bind_addr),
            rate_limit,
            sanitizer: SanitizerConfig {
                mode: sanitizer_mode,
            },
            relay: RelayConfig {
                endpoint: lookup("RELAY_ENDPOINT").unwrap_or_else(default_relay_endpoint),
                timeout_ms: parse_var(&lookup, "RELAY_TIMEOUT_MS").unwrap_or_else(default_relay_timeout_ms),
                ..Default::default()
            },
            status: StatusConfig {
                display_ms: parse_var(&lookup, "STATUS_DISPLAY_MS").unwrap_or_else(default_display_ms),
            },
            metrics: MetricsConfig {
                enabled: parse_var(&lookup, "METRICS_ENABLED").unwrap_or_else(default_true),
                ..Default::default()
            },
            ..Default::default()
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
