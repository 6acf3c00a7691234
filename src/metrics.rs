//! The `metricsEnabled` configuration option: a process-wide flag, set once
//! at init, that turns allocation/time counters on or off. When off, every
//! counter touch is a single relaxed atomic load and an untaken branch — no
//! allocation, no locking, so instrumentation stays branch-free.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static METRICS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Enables process-wide metrics collection. Intended to be called once, at
/// process init, before any `Parser` is constructed; calling it again just
/// flips the same flag.
pub fn enable_metrics() {
    METRICS_ENABLED.store(true, Ordering::Relaxed);
}

pub fn disable_metrics() {
    METRICS_ENABLED.store(false, Ordering::Relaxed);
}

pub fn metrics_enabled() -> bool {
    METRICS_ENABLED.load(Ordering::Relaxed)
}

/// Per-session allocation/time counters. A `Parser` owns one; it is cheap to
/// construct and, when metrics are disabled, every `record_*` call is a
/// single branch that falls straight through.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    nodes_allocated: AtomicU64,
    tokens_scanned: AtomicU64,
    strategy_dispatches: AtomicU64,
    recovered_errors: AtomicU64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_node_allocated(&self) {
        if metrics_enabled() {
            self.nodes_allocated.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_tokens_scanned(&self, count: u64) {
        if metrics_enabled() {
            self.tokens_scanned.fetch_add(count, Ordering::Relaxed);
        }
    }

    pub fn record_strategy_dispatch(&self) {
        if metrics_enabled() {
            self.strategy_dispatches.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_recovered_error(&self) {
        if metrics_enabled() {
            self.recovered_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nodes_allocated: self.nodes_allocated.load(Ordering::Relaxed),
            tokens_scanned: self.tokens_scanned.load(Ordering::Relaxed),
            strategy_dispatches: self.strategy_dispatches.load(Ordering::Relaxed),
            recovered_errors: self.recovered_errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time read of [`SessionMetrics`]; all zero when metrics were
/// never enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub nodes_allocated: u64,
    pub tokens_scanned: u64,
    pub strategy_dispatches: u64,
    pub recovered_errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test: `METRICS_ENABLED` is process-wide, and
    // Rust runs tests in parallel within a crate, so two separate tests
    // toggling the same flag would race each other.
    #[test]
    fn metrics_enabled_flag_gates_counters() {
        disable_metrics();
        let m = SessionMetrics::new();
        m.record_node_allocated();
        m.record_tokens_scanned(10);
        assert_eq!(m.snapshot(), MetricsSnapshot::default());

        enable_metrics();
        m.record_node_allocated();
        m.record_tokens_scanned(5);
        m.record_strategy_dispatch();
        m.record_recovered_error();
        let snap = m.snapshot();
        assert_eq!(snap.nodes_allocated, 1);
        assert_eq!(snap.tokens_scanned, 5);
        assert_eq!(snap.strategy_dispatches, 1);
        assert_eq!(snap.recovered_errors, 1);
        disable_metrics();
    }
}
