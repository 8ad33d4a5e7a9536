// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for abuse simulation results.

use contact_form_guard::guard::Outcome;
use std::collections::HashMap;
use std::time::Duration;

/// Collects metrics during attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Simulated timestamps of the first and last attempt
    first_ms: Option<u64>,
    last_ms: Option<u64>,
    /// Count of attempts by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of attempts by identifier
    attempts_per_client: HashMap<String, usize>,
    /// Ready verdicts whose payload still carried markup brackets
    leaked_markup: usize,
    /// Wall-clock latency samples (microseconds)
    latencies: Vec<u64>,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str, at_ms: u64, latency: Duration) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.attempts_per_client.entry(client.to_string()).or_insert(0) += 1;
        self.first_ms.get_or_insert(at_ms);
        self.last_ms = Some(at_ms);
        self.latencies.push(latency.as_micros() as u64);
    }

    pub fn record_leak(&mut self) {
        self.leaked_markup += 1;
    }

    pub fn total_attempts(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Simulated duration of the attack.
    pub fn duration(&self) -> Duration {
        match (self.first_ms, self.last_ms) {
            (Some(first), Some(last)) => Duration::from_millis(last - first),
            _ => Duration::ZERO,
        }
    }

    /// Ratio of attempts that did not reach `ready_to_send`.
    pub fn block_rate(&self) -> f64 {
        let total = self.total_attempts();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::ReadyToSend)) as f64 / total as f64
    }

    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    pub fn p99_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        let idx = (sorted.len() as f64 * 0.99) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    pub fn unique_clients(&self) -> usize {
        self.attempts_per_client.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_attempts: self.total_attempts(),
            ready: self.count(Outcome::ReadyToSend),
            rate_limited: self.count(Outcome::RateLimited),
            invalid: self.count(Outcome::Invalid),
            leaked_markup: self.leaked_markup,
            duration_ms: self.duration().as_millis() as u64,
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
            p99_latency_us: self.p99_latency_us(),
            unique_clients: self.unique_clients(),
        }
    }
}

/// Summary report of attack metrics.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_attempts: usize,
    pub ready: usize,
    pub rate_limited: usize,
    pub invalid: usize,
    pub leaked_markup: usize,
    pub duration_ms: u64,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub p99_latency_us: u64,
    pub unique_clients: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Simulated span:    {} ms", self.duration_ms)?;
        writeln!(f, "Total Attempts:    {}", self.total_attempts)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(
            f,
            "Ready to send:     {} ({:.1}%)",
            self.ready,
            self.ready as f64 / self.total_attempts.max(1) as f64 * 100.0
        )?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Invalid:           {}", self.invalid)?;
        writeln!(f, "Leaked Markup:     {}", self.leaked_markup)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Latency ---")?;
        writeln!(f, "Median:            {} us", self.median_latency_us)?;
        writeln!(f, "P99:               {} us", self.p99_latency_us)?;
        writeln!(f)?;
        writeln!(f, "Unique Clients:    {}", self.unique_clients)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.record(Outcome::ReadyToSend, "client-a", 0, Duration::from_micros(100));
        metrics.record(Outcome::ReadyToSend, "client-a", 500, Duration::from_micros(150));
        metrics.record(Outcome::RateLimited, "client-b", 1_500, Duration::from_micros(50));

        assert_eq!(metrics.total_attempts(), 3);
        assert_eq!(metrics.count(Outcome::ReadyToSend), 2);
        assert_eq!(metrics.count(Outcome::RateLimited), 1);
        assert_eq!(metrics.unique_clients(), 2);
        assert_eq!(metrics.duration(), Duration::from_millis(1_500));
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for i in 0..3 {
            metrics.record(Outcome::ReadyToSend, "client-a", i, Duration::ZERO);
        }
        for i in 3..10 {
            metrics.record(Outcome::RateLimited, "client-a", i, Duration::ZERO);
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
