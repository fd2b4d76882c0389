use serde::{Deserialize, Serialize};

use crate::constants;
use crate::models::RiskLevel;

/// When an unselected hypothesis must still be surfaced as a "scenario to
/// rule out". Defaults are configurable, not hardcoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSurfacingPolicy {
    pub min_probability: f64,
    pub levels: Vec<RiskLevel>,
}

impl Default for RiskSurfacingPolicy {
    fn default() -> Self {
        Self {
            min_probability: 0.1,
            levels: vec![RiskLevel::High, RiskLevel::Critical],
        }
    }
}

impl RiskSurfacingPolicy {
    /// Probability alone never suppresses a high-risk alternative.
    pub fn must_surface(&self, risk: RiskLevel, probability: f64) -> bool {
        self.levels.contains(&risk) && probability > self.min_probability
    }
}

/// Reasoning engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Weight of hypothesis probability in `final_score`.
    pub probability_weight: f64,
    /// Weight of aggregate source authority in `final_score`.
    pub source_weight_weight: f64,
    /// Weight of (1 − risk_penalty) in `final_score`.
    pub risk_weight: f64,
    /// Tree mode produces between 2 and this many hypotheses.
    pub max_hypotheses: usize,
    pub surfacing: RiskSurfacingPolicy,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            probability_weight: 0.4,
            source_weight_weight: 0.4,
            risk_weight: 0.2,
            max_hypotheses: constants::MAX_HYPOTHESES,
            surfacing: RiskSurfacingPolicy::default(),
        }
    }
}
