use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hypothesis::Hypothesis;
use super::probability::Confidence;
use super::query::Domain;

/// Which reasoning mode produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningMode {
    Cot,
    Tot,
    TotMultiDomain,
}

/// Reconciliation note for a disagreement between two domains' conclusions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossDomainNote {
    pub domains: (Domain, Domain),
    pub note: String,
}

/// Output of the reasoning engine, consumed by action generation and the
/// reasoning transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningResult {
    pub mode: ReasoningMode,
    /// All hypotheses considered; a singleton for CoT.
    pub hypotheses: Vec<Hypothesis>,
    /// ID of the selected hypothesis. Always present in `hypotheses`.
    pub selected: Uuid,
    /// Structured explanation of why the selected hypothesis won.
    pub selection_reasoning: String,
    /// The composed answer text.
    pub answer: String,
    /// IDs of fused documents cited in the answer.
    pub sources_cited: Vec<String>,
    /// High-risk hypotheses that must be surfaced even though unselected.
    pub surfaced_alternatives: Vec<Uuid>,
    /// Cross-domain reconciliation notes (multi-domain mode only).
    pub cross_domain_notes: Vec<CrossDomainNote>,
    pub confidence: Confidence,
    /// Set when a recovery path (mode downgrade, empty retrieval) fired.
    pub degraded: bool,
}

impl ReasoningResult {
    /// The selected hypothesis. Panics only on an internal invariant break,
    /// which construction paths rule out.
    pub fn selected_hypothesis(&self) -> &Hypothesis {
        self.hypotheses
            .iter()
            .find(|h| h.id == self.selected)
            .expect("selected hypothesis is always a member of hypotheses")
    }

    /// Unselected hypotheses that were surfaced as scenarios to rule out.
    pub fn alternatives(&self) -> impl Iterator<Item = &Hypothesis> {
        self.hypotheses
            .iter()
            .filter(|h| self.surfaced_alternatives.contains(&h.id))
    }
}
