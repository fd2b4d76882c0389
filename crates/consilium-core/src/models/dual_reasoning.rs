use serde::{Deserialize, Serialize};

use super::hypothesis::Hypothesis;
use super::query::ModelTier;
use super::reasoning_result::{CrossDomainNote, ReasoningMode};

/// Discrete confidence bucket shown to end users instead of a raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl ConfidenceLabel {
    pub fn text(&self) -> &'static str {
        match self {
            Self::VeryHigh => "very high",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

/// One recorded model call, for the internal trace only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCallRecord {
    /// Which pipeline stage made the call.
    pub stage: String,
    pub tier: ModelTier,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub latency_ms: u64,
    pub succeeded: bool,
}

/// Full internal reasoning trace. Never shown to end users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalTrace {
    pub mode: ReasoningMode,
    pub hypotheses: Vec<Hypothesis>,
    pub selection_reasoning: String,
    pub cross_domain_notes: Vec<CrossDomainNote>,
    pub model_calls: Vec<ModelCallRecord>,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub cost: f64,
    pub latency_ms: u64,
}

/// A short human-readable citation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicCitation {
    /// Fused document ID, so clients can link back.
    pub source_id: String,
    /// e.g. "Statute — VAT consolidation act, art. 16 (2023)".
    pub citation: String,
    pub url: Option<String>,
}

/// User-facing explanation, derived deterministically from the internal
/// trace, with no second model call involved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicReasoning {
    /// One-paragraph summary of the reasoning.
    pub summary: String,
    /// The selected scenario in plain language.
    pub selected_scenario: String,
    /// One-sentence "why this scenario" justification.
    pub justification: String,
    pub sources: Vec<PublicCitation>,
    pub confidence: ConfidenceLabel,
    /// Plain-language notices for surfaced high-risk alternatives.
    pub alternative_notices: Vec<String>,
    /// Plain-language notices for detected source conflicts.
    pub conflict_notices: Vec<String>,
}

/// The debug-only internal trace plus the user-facing explanation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualReasoning {
    pub internal: InternalTrace,
    pub public: PublicReasoning,
}
