//! Aggregate pipeline counters.
//!
//! Lock-free atomics so the orchestrator can share one instance across
//! concurrent requests. `snapshot` is the read path for health endpoints.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use consilium_core::models::ResponseMetadata;

#[derive(Debug, Default)]
pub struct PipelineMetrics {
    queries_total: AtomicU64,
    degraded_total: AtomicU64,
    deadline_exceeded_total: AtomicU64,
    fallback_action_sets_total: AtomicU64,
    regeneration_attempts_total: AtomicU64,
    tokens_in_total: AtomicU64,
    tokens_out_total: AtomicU64,
    latency_ms_total: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub queries_total: u64,
    pub degraded_total: u64,
    pub deadline_exceeded_total: u64,
    pub fallback_action_sets_total: u64,
    pub regeneration_attempts_total: u64,
    pub tokens_in_total: u64,
    pub tokens_out_total: u64,
    /// Mean wall-clock latency per completed query.
    pub avg_latency_ms: u64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &self,
        metadata: &ResponseMetadata,
        tokens_in: u64,
        tokens_out: u64,
        actions_fell_back: bool,
    ) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        if metadata.degraded {
            self.degraded_total.fetch_add(1, Ordering::Relaxed);
        }
        if actions_fell_back {
            self.fallback_action_sets_total.fetch_add(1, Ordering::Relaxed);
        }
        self.regeneration_attempts_total
            .fetch_add(u64::from(metadata.regeneration_attempts), Ordering::Relaxed);
        self.tokens_in_total.fetch_add(tokens_in, Ordering::Relaxed);
        self.tokens_out_total
            .fetch_add(tokens_out, Ordering::Relaxed);
        self.latency_ms_total
            .fetch_add(metadata.latency_ms, Ordering::Relaxed);
    }

    pub fn record_deadline_exceeded(&self) {
        self.deadline_exceeded_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let queries = self.queries_total.load(Ordering::Relaxed);
        let latency_total = self.latency_ms_total.load(Ordering::Relaxed);
        MetricsSnapshot {
            queries_total: queries,
            degraded_total: self.degraded_total.load(Ordering::Relaxed),
            deadline_exceeded_total: self.deadline_exceeded_total.load(Ordering::Relaxed),
            fallback_action_sets_total: self.fallback_action_sets_total.load(Ordering::Relaxed),
            regeneration_attempts_total: self.regeneration_attempts_total.load(Ordering::Relaxed),
            tokens_in_total: self.tokens_in_total.load(Ordering::Relaxed),
            tokens_out_total: self.tokens_out_total.load(Ordering::Relaxed),
            avg_latency_ms: if queries == 0 {
                0
            } else {
                latency_total / queries
            },
        }
    }
}
