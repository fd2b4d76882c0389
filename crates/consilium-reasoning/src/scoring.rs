//! Hypothesis scoring and selection.
//!
//! final_score = 0.4·probability + 0.4·source_weight + 0.2·(1 − risk_penalty),
//! weights configurable. Selection takes the highest final_score, but a
//! high-risk alternative above the probability floor is always surfaced
//! as a scenario to rule out; probability alone never suppresses it.

use uuid::Uuid;

use consilium_core::authority::AuthorityTable;
use consilium_core::config::{ReasoningConfig, RiskSurfacingPolicy};
use consilium_core::models::{FusedDocument, Hypothesis};

/// Aggregate authority of a hypothesis' supporting sources: the mean
/// hierarchy weight of the fused documents it cites, 0 when it cites none.
pub fn source_weight(
    supporting: &[String],
    documents: &[FusedDocument],
    authority: &AuthorityTable,
) -> f64 {
    let weights: Vec<f64> = supporting
        .iter()
        .filter_map(|id| {
            documents
                .iter()
                .find(|d| d.id() == id)
                .map(|d| authority.weight(d.candidate.source_category))
        })
        .collect();
    if weights.is_empty() {
        return 0.0;
    }
    weights.iter().sum::<f64>() / weights.len() as f64
}

/// Compute `final_score` for one hypothesis.
pub fn final_score(config: &ReasoningConfig, hypothesis: &Hypothesis) -> f64 {
    config.probability_weight * hypothesis.probability.value()
        + config.source_weight_weight * hypothesis.source_weight
        + config.risk_weight * (1.0 - hypothesis.risk_level.penalty())
}

/// Fill in `source_weight` and `final_score` for every hypothesis.
pub fn score_all(
    hypotheses: &mut [Hypothesis],
    documents: &[FusedDocument],
    authority: &AuthorityTable,
    config: &ReasoningConfig,
) {
    for h in hypotheses.iter_mut() {
        h.source_weight = source_weight(&h.supporting_sources, documents, authority);
        h.final_score = final_score(config, h);
    }
}

/// Index of the winning hypothesis: highest `final_score`, ties broken by
/// higher `source_weight`, then by position (deterministic).
pub fn select(hypotheses: &[Hypothesis]) -> usize {
    let mut best = 0;
    for (i, h) in hypotheses.iter().enumerate().skip(1) {
        let current = &hypotheses[best];
        let better = h.final_score > current.final_score
            || (h.final_score == current.final_score && h.source_weight > current.source_weight);
        if better {
            best = i;
        }
    }
    best
}

/// IDs of unselected hypotheses that the surfacing policy forces into the
/// output as scenarios to rule out.
pub fn surface_alternatives(
    hypotheses: &[Hypothesis],
    selected: usize,
    policy: &RiskSurfacingPolicy,
) -> Vec<Uuid> {
    hypotheses
        .iter()
        .enumerate()
        .filter(|(i, h)| {
            *i != selected && policy.must_surface(h.risk_level, h.probability.value())
        })
        .map(|(_, h)| h.id)
        .collect()
}
