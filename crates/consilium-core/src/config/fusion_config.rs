use serde::{Deserialize, Serialize};

use crate::constants;

/// Fusion ranker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// RRF smoothing constant. Higher k reduces the influence of
    /// high-ranking items from any single list.
    pub rrf_k: f64,
    /// Per-list fusion weight for lexical variants.
    pub lexical_weight: f64,
    /// Per-list fusion weight for semantic variants.
    pub semantic_weight: f64,
    /// Per-list fusion weight for the HyDE-seeded vector list.
    pub hyde_weight: f64,
    /// Fused documents passed downstream.
    pub top_n: usize,
    /// Candidates requested from the retriever per variant.
    pub top_k_per_variant: usize,
    /// Documents published within this window get a recency boost.
    pub recency_window_days: i64,
    /// Maximum recency boost (0.5 = up to +50%).
    pub recency_boost_max: f64,
    /// Minimum term overlap for two excerpts to count as the same topic.
    pub topic_overlap_threshold: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rrf_k: constants::RRF_K,
            lexical_weight: 0.3,
            semantic_weight: 0.4,
            hyde_weight: 0.3,
            top_n: constants::DEFAULT_TOP_N,
            top_k_per_variant: 10,
            recency_window_days: 730,
            recency_boost_max: 0.5,
            topic_overlap_threshold: 0.3,
        }
    }
}
