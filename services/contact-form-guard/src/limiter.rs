// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter for contact form submit attempts.
//!
//! Each identifier owns the timestamps of its allowed attempts inside the
//! trailing window. Expired timestamps are pruned on every check; a new
//! attempt is recorded only when fewer than `max_attempts` remain.
//!
//! Storage and time are injected ([`AttemptStore`], [`Clock`]) so tests can
//! drive the window with a [`ManualClock`] and a deployment can share one
//! store between limiters.

use crate::config::RateLimitConfig;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Identifier-keyed attempt storage.
///
/// `update` must run the closure while holding exclusive access to the
/// identifier's attempts, so prune-and-append is atomic per store.
pub trait AttemptStore: Send + Sync {
    /// Mutate the attempts for `identifier`, creating an empty list on first use.
    fn update<R>(&self, identifier: &str, f: impl FnOnce(&mut Vec<u64>) -> R) -> R;

    /// Copy of the stored attempts; empty for unknown identifiers.
    fn snapshot(&self, identifier: &str) -> Vec<u64>;

    /// Drop identifiers for which `keep` returns false. Returns how many were dropped.
    fn retain(&self, keep: &mut dyn FnMut(&str, &[u64]) -> bool) -> usize;
}

/// Process-local attempt store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    attempts: Mutex<HashMap<String, Vec<u64>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identifiers currently tracked.
    pub fn len(&self) -> usize {
        self.attempts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.lock().is_empty()
    }
}

impl AttemptStore for InMemoryStore {
    fn update<R>(&self, identifier: &str, f: impl FnOnce(&mut Vec<u64>) -> R) -> R {
        let mut attempts = self.attempts.lock();
        let entry = attempts.entry(identifier.to_string()).or_default();
        f(entry)
    }

    fn snapshot(&self, identifier: &str) -> Vec<u64> {
        self.attempts
            .lock()
            .get(identifier)
            .cloned()
            .unwrap_or_default()
    }

    fn retain(&self, keep: &mut dyn FnMut(&str, &[u64]) -> bool) -> usize {
        let mut attempts = self.attempts.lock();
        let before = attempts.len();
        attempts.retain(|id, times| keep(id, times));
        before - attempts.len()
    }
}

impl<T: AttemptStore> AttemptStore for Arc<T> {
    fn update<R>(&self, identifier: &str, f: impl FnOnce(&mut Vec<u64>) -> R) -> R {
        (**self).update(identifier, f)
    }

    fn snapshot(&self, identifier: &str) -> Vec<u64> {
        (**self).snapshot(identifier)
    }

    fn retain(&self, keep: &mut dyn FnMut(&str, &[u64]) -> bool) -> usize {
        (**self).retain(keep)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Attempt recorded
    Allowed {
        /// Attempts left in the current window
        remaining: u32,
    },
    /// Attempt rejected, nothing recorded
    Limited {
        /// Time until the oldest attempt leaves the window
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Sliding-window rate limiter.
pub struct RateLimiter<S = InMemoryStore, C = SystemClock> {
    config: RateLimitConfig,
    store: S,
    clock: C,
}

impl RateLimiter {
    /// Create an in-memory limiter on the wall clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_parts(config, InMemoryStore::new(), SystemClock)
    }
}

impl<S: AttemptStore, C: Clock> RateLimiter<S, C> {
    pub fn with_parts(config: RateLimitConfig, store: S, clock: C) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Prune expired attempts, then record this one if there is room.
    pub fn check(&self, identifier: &str) -> RateLimitResult {
        let now = self.clock.now_ms();
        let window = self.config.window_ms;
        let max = self.config.max_attempts as usize;

        let result = self.store.update(identifier, |attempts| {
            attempts.retain(|&t| now.saturating_sub(t) < window);

            if attempts.len() >= max {
                let oldest = attempts.iter().copied().min().unwrap_or(now);
                RateLimitResult::Limited {
                    retry_after: retry_after(window, now, oldest),
                }
            } else {
                attempts.push(now);
                RateLimitResult::Allowed {
                    remaining: (max - attempts.len()) as u32,
                }
            }
        });

        if let RateLimitResult::Limited { retry_after } = result {
            debug!(identifier, ?retry_after, "Attempt rate limited");
        }
        result
    }

    /// True when the attempt was allowed and recorded.
    pub fn is_allowed(&self, identifier: &str) -> bool {
        self.check(identifier).is_allowed()
    }

    /// Time until the next attempt would be allowed; zero when not limited.
    ///
    /// Reads without mutating. Attempts already outside the window are not
    /// counted, so the answer matches what the next [`check`](Self::check)
    /// would see.
    pub fn remaining_time(&self, identifier: &str) -> Duration {
        let now = self.clock.now_ms();
        let window = self.config.window_ms;

        let live: Vec<u64> = self
            .store
            .snapshot(identifier)
            .into_iter()
            .filter(|&t| now.saturating_sub(t) < window)
            .collect();

        if live.len() < self.config.max_attempts as usize {
            return Duration::ZERO;
        }

        let oldest = live.iter().copied().min().unwrap_or(now);
        retry_after(window, now, oldest)
    }

    /// Forget identifiers whose attempts have all left the window.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let window = self.config.window_ms;
        let removed = self
            .store
            .retain(&mut |_: &str, times: &[u64]| times.iter().any(|&t| now.saturating_sub(t) < window));
        if removed > 0 {
            debug!(removed, "Purged expired rate limit entries");
        }
        removed
    }
}

fn retry_after(window_ms: u64, now: u64, oldest: u64) -> Duration {
    Duration::from_millis(window_ms.saturating_sub(now.saturating_sub(oldest)))
}
