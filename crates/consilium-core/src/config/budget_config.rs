use serde::{Deserialize, Serialize};

use crate::constants;

/// Per-call timeouts and retry budgets, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Complexity classifier call budget. The classifier never blocks
    /// retrieval; on timeout it defaults to `simple`.
    pub classifier_timeout_ms: u64,
    /// Per-variant retrieval call timeout. Timed-out variants are
    /// dropped, not retried.
    pub retrieval_timeout_ms: u64,
    /// Expansion (paraphrase + HyDE) call timeout.
    pub expansion_timeout_ms: u64,
    /// Reasoning / answer-composition call timeout.
    pub generation_timeout_ms: u64,
    /// Golden-loop correction call timeout. A timeout here goes straight
    /// to safe fallback.
    pub regeneration_timeout_ms: u64,
    /// Backoff retries for transient generator failures.
    pub max_transient_retries: u32,
    /// Base backoff delay; doubles per attempt.
    pub backoff_base_ms: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            classifier_timeout_ms: constants::CLASSIFIER_BUDGET_MS,
            retrieval_timeout_ms: 2_000,
            expansion_timeout_ms: 3_000,
            generation_timeout_ms: 8_000,
            regeneration_timeout_ms: 4_000,
            max_transient_retries: constants::MAX_TRANSIENT_RETRIES,
            backoff_base_ms: 200,
        }
    }
}
