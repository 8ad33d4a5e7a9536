// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Guard
//!
//! Client-side safety layer for the portfolio contact form, run before a
//! message is handed to the external form relay:
//!
//! - Markup stripping of free-text fields (rich and basic strategies)
//! - Name, email and message validation with per-field messages
//! - Sliding-window rate limiting of submit attempts (3 per 10 minutes)
//! - Rate check before validation, so every submit spends budget
//! - Fire-and-forget security event reporting

pub mod config;
pub mod events;
pub mod guard;
pub mod handlers;
pub mod limiter;
pub mod links;
pub mod metrics;
pub mod relay;
pub mod sanitizer;
pub mod status;
pub mod validator;

pub use crate::config::Config;
pub use crate::guard::{SubmissionGuard, Verdict, CONTACT_FORM_ID};
pub use crate::limiter::{RateLimitResult, RateLimiter};
pub use crate::sanitizer::{BasicSanitizer, RichSanitizer, Sanitizer};
pub use crate::validator::{FieldValidator, SubmissionInput, ValidationVerdict};
