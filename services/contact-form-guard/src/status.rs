// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! User-visible form status.
//!
//! At most one notice is shown at a time. Every notice except
//! `Submitting` clears itself once the display duration has elapsed.

use crate::config::StatusConfig;
use crate::guard::{retry_message, Verdict};
use crate::limiter::Clock;
use serde::Serialize;
use std::time::Duration;

pub const SENT_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";
pub const SEND_FAILED_MESSAGE: &str =
    "Failed to send message. Please try again or contact me directly.";
pub const INVALID_MESSAGE: &str = "Please fix the highlighted fields.";
pub const SUBMITTING_MESSAGE: &str = "Sending...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    Idle,
    Submitting,
    Invalid,
    RateLimited,
    Success,
    Error,
}

/// A status and its message, stamped with when it was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusNotice {
    pub status: FormStatus,
    pub message: String,
    pub shown_at_ms: u64,
}

pub struct StatusBoard<C> {
    clock: C,
    display: Duration,
    notice: Option<StatusNotice>,
}

impl<C: Clock> StatusBoard<C> {
    pub fn new(config: &StatusConfig, clock: C) -> Self {
        Self {
            clock,
            display: config.display_duration(),
            notice: None,
        }
    }

    /// The notice currently visible, if any.
    pub fn notice(&self) -> Option<&StatusNotice> {
        let notice = self.notice.as_ref()?;
        if notice.status == FormStatus::Submitting {
            return Some(notice);
        }
        let age = self.clock.now_ms().saturating_sub(notice.shown_at_ms);
        (age < self.display.as_millis() as u64).then_some(notice)
    }

    pub fn status(&self) -> FormStatus {
        self.notice().map_or(FormStatus::Idle, |n| n.status)
    }

    /// Show the notice matching a guard verdict.
    ///
    /// A ready verdict moves the form to `Submitting` until the relay
    /// call reports back through [`sent`](Self::sent) or
    /// [`send_failed`](Self::send_failed).
    pub fn show_verdict(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::RateLimited { retry_after } => {
                self.show(FormStatus::RateLimited, retry_message(*retry_after))
            }
            Verdict::Invalid(_) => self.show(FormStatus::Invalid, INVALID_MESSAGE.to_string()),
            Verdict::ReadyToSend(_) => {
                self.show(FormStatus::Submitting, SUBMITTING_MESSAGE.to_string())
            }
        }
    }

    pub fn sent(&mut self) {
        self.show(FormStatus::Success, SENT_MESSAGE.to_string());
    }

    pub fn send_failed(&mut self) {
        self.show(FormStatus::Error, SEND_FAILED_MESSAGE.to_string());
    }

    pub fn clear(&mut self) {
        self.notice = None;
    }

    fn show(&mut self, status: FormStatus, message: String) {
        self.notice = Some(StatusNotice {
            status,
            message,
            shown_at_ms: self.clock.now_ms(),
        });
    }
}
