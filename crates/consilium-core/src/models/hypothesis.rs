use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::probability::Probability;

/// Sanction/exposure severity if a hypothesis turns out to be wrong.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Numeric penalty fed into `final_score`. Critical > high > medium > low.
    pub fn penalty(&self) -> f64 {
        match self {
            Self::Low => 0.1,
            Self::Medium => 0.3,
            Self::High => 0.6,
            Self::Critical => 0.9,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// One competing scenario in tree-mode reasoning. Singleton in linear mode.
///
/// Produced fresh per query, never persisted beyond the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: Uuid,
    /// The scenario in one or two sentences.
    pub scenario: String,
    pub assumptions: Vec<String>,
    /// IDs of supporting `FusedDocument`s.
    pub supporting_sources: Vec<String>,
    /// Likelihood given the query context.
    pub probability: Probability,
    /// Aggregate authority of supporting sources, in [0, 1].
    pub source_weight: f64,
    pub risk_level: RiskLevel,
    /// Computed: 0.4·probability + 0.4·source_weight + 0.2·(1 − risk_penalty).
    pub final_score: f64,
    /// Domain this hypothesis was scored under, for multi-domain runs.
    pub domain: Option<super::query::Domain>,
}

impl Hypothesis {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            scenario: scenario.into(),
            assumptions: Vec::new(),
            supporting_sources: Vec::new(),
            probability: Probability::default(),
            source_weight: 0.0,
            risk_level: RiskLevel::Low,
            final_score: 0.0,
            domain: None,
        }
    }
}
