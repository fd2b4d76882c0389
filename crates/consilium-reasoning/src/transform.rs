//! Reasoning transformer: internal trace to user-facing explanation.
//!
//! Pure and deterministic. The "why this scenario" sentence is built from
//! structured selection signals instead of a second model call, so the
//! public explanation exists even when a late model call failed.

use chrono::Datelike;

use consilium_core::models::{
    Confidence, ConfidenceLabel, Conflict, FusedDocument, PublicCitation, PublicReasoning,
    ReasoningResult,
};

/// Map numeric confidence into the fixed label set.
pub fn confidence_label(confidence: Confidence) -> ConfidenceLabel {
    let v = confidence.value();
    if v >= 0.85 {
        ConfidenceLabel::VeryHigh
    } else if v >= 0.65 {
        ConfidenceLabel::High
    } else if v >= 0.4 {
        ConfidenceLabel::Moderate
    } else {
        ConfidenceLabel::Low
    }
}

/// Reduce a fused document to a short human-readable citation.
pub fn citation(doc: &FusedDocument) -> PublicCitation {
    let year = doc
        .candidate
        .published_date
        .map(|d| format!(" ({})", d.year()))
        .unwrap_or_default();
    PublicCitation {
        source_id: doc.candidate.id.clone(),
        citation: format!(
            "{} — {}{year}",
            doc.candidate.source_category.label(),
            doc.candidate.title
        ),
        url: doc.candidate.url.clone(),
    }
}

/// One-sentence "why this scenario" from structured selection signals.
fn justification(result: &ReasoningResult) -> String {
    let selected = result.selected_hypothesis();
    let mut parts = Vec::new();
    if selected.probability.value() >= 0.6 {
        parts.push("it is the most likely reading of your situation");
    }
    if selected.source_weight >= 0.6 {
        parts.push("it rests on the highest-ranking sources found");
    }
    if parts.is_empty() {
        parts.push("it scored best across likelihood, source authority, and risk");
    }
    format!("This scenario was selected because {}.", parts.join(" and "))
}

fn summary(result: &ReasoningResult) -> String {
    let selected = result.selected_hypothesis();
    match result.hypotheses.len() {
        1 => format!(
            "The question was answered directly from {} cited source(s).",
            result.sources_cited.len()
        ),
        n => format!(
            "{n} scenarios were compared; '{}' prevailed with a weighted score of {:.2}.",
            selected.scenario, selected.final_score
        ),
    }
}

/// Notices for the surfaced high-risk alternatives.
fn alternative_notices(result: &ReasoningResult) -> Vec<String> {
    result
        .alternatives()
        .map(|h| {
            format!(
                "Scenario to rule out ({} risk): {}",
                h.risk_level.label(),
                h.scenario
            )
        })
        .collect()
}

/// Notices for detected source conflicts, only for documents the answer
/// actually cites.
fn conflict_notices(result: &ReasoningResult, conflicts: &[Conflict]) -> Vec<String> {
    conflicts
        .iter()
        .filter(|c| {
            result.sources_cited.contains(&c.higher_id) || result.sources_cited.contains(&c.lower_id)
        })
        .map(|c| c.recommendation.clone())
        .collect()
}

/// Build the public half of the dual reasoning output.
pub fn public_reasoning(
    result: &ReasoningResult,
    documents: &[FusedDocument],
    conflicts: &[Conflict],
) -> PublicReasoning {
    let sources = result
        .sources_cited
        .iter()
        .filter_map(|id| documents.iter().find(|d| d.id() == id))
        .map(citation)
        .collect();

    PublicReasoning {
        summary: summary(result),
        selected_scenario: result.selected_hypothesis().scenario.clone(),
        justification: justification(result),
        sources,
        confidence: confidence_label(result.confidence),
        alternative_notices: alternative_notices(result),
        conflict_notices: conflict_notices(result, conflicts),
    }
}
