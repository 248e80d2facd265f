//! Cycle outcome counters and latency summary
//!
//! Owned by the tracker loop; nothing here is shared across tasks.

use crate::constants::METRICS_WINDOW;
use crate::tracker::CycleOutcome;
use std::collections::VecDeque;
use std::time::Duration;

/// Point-in-time summary of all cycles run so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    /// Cycles started (including ones that failed unexpectedly)
    pub total_cycles: u64,
    /// Messages accepted by the webhook
    pub delivered: u64,
    /// Cycles where the provider returned no data
    pub fetch_failures: u64,
    /// Cycles where the fetched snapshot was empty, so no message was built
    pub empty_messages: u64,
    /// Cycles where the webhook rejected or missed the message
    pub notify_failures: u64,
    /// Cycles aborted by an unexpected failure
    pub unexpected_errors: u64,
    /// 50th percentile cycle latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile cycle latency in milliseconds
    pub latency_p99_ms: f64,
}

impl CycleSummary {
    /// Fraction of cycles that ended with a delivered message (0.0 to 1.0)
    pub fn delivery_rate(&self) -> f64 {
        if self.total_cycles == 0 {
            return 1.0;
        }
        self.delivered as f64 / self.total_cycles as f64
    }
}

/// Collects cycle outcomes for the tracker
#[derive(Debug, Default)]
pub struct CycleMetrics {
    summary: CycleSummary,
    /// Rolling window of cycle latencies in milliseconds
    samples: VecDeque<f64>,
}

impl CycleMetrics {
    pub fn new() -> Self {
        Self {
            summary: CycleSummary::default(),
            samples: VecDeque::with_capacity(METRICS_WINDOW),
        }
    }

    /// Records a cycle that ran to completion
    pub fn record(&mut self, outcome: CycleOutcome, duration: Duration) {
        self.summary.total_cycles += 1;
        match outcome {
            CycleOutcome::Delivered => self.summary.delivered += 1,
            CycleOutcome::NoData => self.summary.fetch_failures += 1,
            CycleOutcome::NoMessage => self.summary.empty_messages += 1,
            CycleOutcome::NotifyFailed => self.summary.notify_failures += 1,
        }

        if self.samples.len() >= METRICS_WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(duration.as_secs_f64() * 1000.0);
    }

    /// Records a cycle that was aborted
    pub fn record_unexpected(&mut self) {
        self.summary.total_cycles += 1;
        self.summary.unexpected_errors += 1;
    }

    /// Computes the current summary
    pub fn summary(&self) -> CycleSummary {
        let mut latencies: Vec<f64> = self.samples.iter().copied().collect();
        latencies.sort_by(|a, b| a.total_cmp(b));

        CycleSummary {
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            ..self.summary.clone()
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_each_outcome() {
        let mut metrics = CycleMetrics::new();
        metrics.record(CycleOutcome::Delivered, Duration::from_millis(100));
        metrics.record(CycleOutcome::Delivered, Duration::from_millis(300));
        metrics.record(CycleOutcome::NoData, Duration::from_millis(200));
        metrics.record(CycleOutcome::NotifyFailed, Duration::from_millis(50));
        metrics.record_unexpected();

        let summary = metrics.summary();
        assert_eq!(summary.total_cycles, 5);
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.fetch_failures, 1);
        assert_eq!(summary.notify_failures, 1);
        assert_eq!(summary.unexpected_errors, 1);
        assert_eq!(summary.latency_p50_ms, 200.0);
        assert_eq!(summary.latency_p99_ms, 300.0);
        assert!((summary.delivery_rate() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut metrics = CycleMetrics::new();
        for i in 0..(METRICS_WINDOW + 20) {
            metrics.record(CycleOutcome::Delivered, Duration::from_millis(i as u64));
        }
        assert_eq!(metrics.samples.len(), METRICS_WINDOW);
        assert_eq!(metrics.summary().total_cycles, (METRICS_WINDOW + 20) as u64);
    }

    #[test]
    fn test_percentile() {
        let values: Vec<f64> = (1..=11).map(f64::from).collect();
        assert_eq!(percentile(&values, 50.0), 6.0);
        assert_eq!(percentile(&values, 99.0), 11.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
