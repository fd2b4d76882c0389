use serde::{Deserialize, Serialize};

use super::action::SuggestedAction;
use super::dual_reasoning::{DualReasoning, PublicCitation};
use super::query::{Complexity, ModelTier};

/// Record of one recovery path that fired during the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationNote {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
}

/// Response metadata for observability and billing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Highest tier used across the pipeline.
    pub model_used: ModelTier,
    pub complexity: Complexity,
    pub cost: f64,
    pub latency_ms: u64,
    pub regeneration_attempts: u32,
    /// True when any recovery path fired.
    pub degraded: bool,
    pub degradations: Vec<DegradationNote>,
}

/// The single value returned by `Orchestrator::process`. Producing it has
/// no side effects beyond cost-tracker notifications; persistence and
/// delivery belong to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedResponse {
    pub answer: String,
    pub sources_cited: Vec<PublicCitation>,
    pub suggested_actions: Vec<SuggestedAction>,
    pub reasoning: DualReasoning,
    pub metadata: ResponseMetadata,
}
