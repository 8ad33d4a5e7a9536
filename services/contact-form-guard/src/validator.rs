// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form field validation.
//!
//! Validators are pure: they check the value they are handed and never
//! sanitize it themselves. [`FieldValidator::validate_form`] aggregates the
//! three field checks into a [`ValidationVerdict`].

use crate::config::ValidationConfig;
use ::validator::ValidateEmail;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("valid regex"));

// Dotted host name ending in an alphabetic or punycode TLD. Rejects bare
// hosts and `[...]` address literals.
static EMAIL_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+(?:\p{L}{2,}|xn--[a-z0-9-]{2,})$")
        .expect("valid regex")
});

/// A tracked contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    fn required_message(self) -> &'static str {
        match self {
            Self::Name => "Name is required",
            Self::Email => "Email is required",
            Self::Message => "Message is required",
        }
    }

    fn invalid_message(self) -> &'static str {
        match self {
            Self::Name => "Please enter a valid name (2-50 characters, letters only)",
            Self::Email => "Please enter a valid email address",
            Self::Message => "Message must be between 10-1000 characters",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Message => write!(f, "message"),
        }
    }
}

/// User-supplied form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl SubmissionInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }
}

/// Per-field validation errors. A field without an entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationVerdict {
    errors: BTreeMap<Field, String>,
}

impl ValidationVerdict {
    /// True when no tracked field has an error.
    pub fn is_passing(&self) -> bool {
        Field::ALL.iter().all(|f| !self.errors.contains_key(f))
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn failing_fields(&self) -> Vec<Field> {
        self.errors.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Field validator configured with acceptance limits.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    config: ValidationConfig,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl FieldValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Name: allowed length in characters and letters, spaces, `'` and `-` only.
    pub fn validate_name(&self, value: &str) -> bool {
        let len = value.chars().count();
        len >= self.config.name_min_chars
            && len <= self.config.name_max_chars
            && NAME_CHARS.is_match(value)
    }

    /// Email: syntactically valid address no longer than the configured
    /// maximum, on a domain with a top-level label.
    pub fn validate_email(&self, value: &str) -> bool {
        value.len() <= self.config.email_max_len
            && value.validate_email()
            && value
                .rsplit_once('@')
                .is_some_and(|(_, domain)| EMAIL_DOMAIN.is_match(domain))
    }

    /// Message: allowed length in characters.
    pub fn validate_message(&self, value: &str) -> bool {
        let len = value.chars().count();
        len >= self.config.message_min_chars && len <= self.config.message_max_chars
    }

    pub fn validate_field(&self, field: Field, value: &str) -> bool {
        match field {
            Field::Name => self.validate_name(value),
            Field::Email => self.validate_email(value),
            Field::Message => self.validate_message(value),
        }
    }

    /// Run every field check and collect one message per failing field.
    pub fn validate_form(&self, input: &SubmissionInput) -> ValidationVerdict {
        let mut errors = BTreeMap::new();

        for field in Field::ALL {
            let value = input.get(field);
            if value.trim().is_empty() {
                errors.insert(field, field.required_message().to_string());
            } else if !self.validate_field(field, value) {
                errors.insert(field, field.invalid_message().to_string());
            }
        }

        debug!(failing = errors.len(), "Form validated");
        ValidationVerdict { errors }
    }
}
