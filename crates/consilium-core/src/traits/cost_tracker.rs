use crate::models::ModelTier;

/// Usage metering collaborator. Fire-and-forget from the orchestrator's
/// perspective; failures are logged and ignored.
pub trait CostTracker: Send + Sync {
    fn record(&self, tier: ModelTier, tokens_in: u64, tokens_out: u64);
}

/// No-op tracker for tests and standalone runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCostTracker;

impl CostTracker for NoopCostTracker {
    fn record(&self, _tier: ModelTier, _tokens_in: u64, _tokens_out: u64) {}
}
