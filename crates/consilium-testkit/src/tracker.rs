use std::sync::atomic::{AtomicU64, Ordering};

use consilium_core::models::ModelTier;
use consilium_core::traits::CostTracker;

/// A `CostTracker` that counts calls and tokens with atomics.
#[derive(Debug, Default)]
pub struct CountingCostTracker {
    pub calls: AtomicU64,
    pub economy_calls: AtomicU64,
    pub premium_calls: AtomicU64,
    pub tokens_in: AtomicU64,
    pub tokens_out: AtomicU64,
}

impl CountingCostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl CostTracker for CountingCostTracker {
    fn record(&self, tier: ModelTier, tokens_in: u64, tokens_out: u64) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match tier {
            ModelTier::Economy => self.economy_calls.fetch_add(1, Ordering::Relaxed),
            ModelTier::Premium => self.premium_calls.fetch_add(1, Ordering::Relaxed),
        };
        self.tokens_in.fetch_add(tokens_in, Ordering::Relaxed);
        self.tokens_out.fetch_add(tokens_out, Ordering::Relaxed);
    }
}
