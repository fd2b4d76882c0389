//! Tree-of-thought hypothesis generation for complex queries.
//!
//! One model call proposes competing scenarios for the same facts. The
//! payload is validated hard: fewer than two scenarios is malformed (a
//! single scenario is linear reasoning in disguise), supporting citations
//! are filtered against the retrieved documents, and anything beyond the
//! configured maximum is truncated rather than rejected.

use serde::Deserialize;
use tracing::debug;

use consilium_core::errors::GenerationError;
use consilium_core::models::{Domain, FusedDocument, Hypothesis, ModelTier, Probability, RiskLevel};
use consilium_core::structured::parse_payload;
use consilium_core::traits::{CompletionConstraints, TextGenerator};

/// A scenario needs a real competitor to be worth scoring.
const MIN_HYPOTHESES: usize = 2;

#[derive(Debug, Deserialize)]
struct HypothesisPayload {
    scenario: String,
    #[serde(default)]
    assumptions: Vec<String>,
    #[serde(default)]
    supporting_source_ids: Vec<String>,
    probability: f64,
    risk_level: RiskLevel,
}

#[derive(Debug, Deserialize)]
struct HypothesesPayload {
    hypotheses: Vec<HypothesisPayload>,
}

fn document_block(documents: &[FusedDocument]) -> String {
    documents
        .iter()
        .map(|d| {
            format!(
                "[{}] {} ({}): {}",
                d.candidate.id,
                d.candidate.title,
                d.candidate.source_category.label(),
                d.candidate.excerpt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn hypotheses_prompt(
    query: &str,
    history_digest: Option<&str>,
    client_notes: Option<&str>,
    domain: Option<Domain>,
    documents: &[FusedDocument],
    max: usize,
) -> String {
    let mut prompt = format!(
        "Enumerate between {MIN_HYPOTHESES} and {max} competing scenarios that could \
         apply to the user's tax situation. For each, state the scenario, its \
         assumptions, the IDs of supporting sources, a probability in [0,1], and a \
         risk_level of low, medium, high, or critical if the scenario is wrongly \
         dismissed. Respond with a single JSON object: \
         {{\"hypotheses\": [{{\"scenario\": \"...\", \"assumptions\": [\"...\"], \
         \"supporting_source_ids\": [\"...\"], \"probability\": 0.0, \
         \"risk_level\": \"low\"}}]}}.\n",
    );
    if let Some(domain) = domain {
        prompt.push_str(&format!(
            "\nRestrict the scenarios to the {} domain.\n",
            domain.label()
        ));
    }
    if let Some(digest) = history_digest {
        prompt.push_str(&format!("\nConversation so far:\n{digest}\n"));
    }
    if let Some(notes) = client_notes {
        prompt.push_str(&format!("\nClient context:\n{notes}\n"));
    }
    if documents.is_empty() {
        prompt.push_str("\nNo sources were retrieved; leave supporting_source_ids empty.\n");
    } else {
        prompt.push_str(&format!("\nSources:\n{}\n", document_block(documents)));
    }
    prompt.push_str(&format!("\nQuestion: {query}\n"));
    prompt
}

/// Generate competing hypotheses for one query (optionally narrowed to a
/// single domain for multi-domain runs). Scores are filled in later by
/// the scoring pass.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn generate_hypotheses(
    generator: &dyn TextGenerator,
    tier: ModelTier,
    query: &str,
    history_digest: Option<&str>,
    client_notes: Option<&str>,
    domain: Option<Domain>,
    documents: &[FusedDocument],
    max: usize,
    strict: bool,
) -> Result<Vec<Hypothesis>, GenerationError> {
    let prompt = hypotheses_prompt(query, history_digest, client_notes, domain, documents, max);
    let constraints = if strict {
        CompletionConstraints::strict_json()
    } else {
        CompletionConstraints::json()
    };
    let completion = generator.complete(tier, &prompt, &constraints).await?;
    let payload: HypothesesPayload = parse_payload(&completion.text, strict)?;

    if payload.hypotheses.len() < MIN_HYPOTHESES {
        return Err(GenerationError::MalformedOutput {
            reason: format!(
                "{} scenario(s) returned, at least {MIN_HYPOTHESES} required",
                payload.hypotheses.len()
            ),
        });
    }
    if payload.hypotheses.len() > max {
        debug!(
            returned = payload.hypotheses.len(),
            max, "truncating oversized hypothesis set"
        );
    }

    Ok(payload
        .hypotheses
        .into_iter()
        .take(max)
        .map(|p| {
            let mut h = Hypothesis::new(p.scenario);
            h.assumptions = p.assumptions;
            h.supporting_sources = p
                .supporting_source_ids
                .into_iter()
                .filter(|id| documents.iter().any(|d| d.id() == id))
                .collect();
            h.probability = Probability::new(p.probability);
            h.risk_level = p.risk_level;
            h.domain = domain;
            h
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_core::authority::SourceCategory;
    use consilium_testkit::{candidate, fused, ScriptedGenerator};

    fn docs() -> Vec<FusedDocument> {
        vec![fused(
            candidate("statute-1", "cessione interna", SourceCategory::Statute),
            1.0,
        )]
    }

    const TWO_SCENARIOS: &str = r#"{"hypotheses": [
        {"scenario": "Cessione interna", "assumptions": ["cliente residente"],
         "supporting_source_ids": ["statute-1"], "probability": 0.7, "risk_level": "low"},
        {"scenario": "Operazione intracomunitaria", "assumptions": [],
         "supporting_source_ids": ["statute-1", "ghost-9"], "probability": 0.3, "risk_level": "high"}
    ]}"#;

    #[tokio::test]
    async fn parses_scenarios_and_filters_citations() {
        let generator = ScriptedGenerator::single(TWO_SCENARIOS);
        let hypotheses = generate_hypotheses(
            &generator,
            ModelTier::Premium,
            "fattura a cliente tedesco",
            None,
            None,
            None,
            &docs(),
            4,
            false,
        )
        .await
        .unwrap();

        assert_eq!(hypotheses.len(), 2);
        assert_eq!(hypotheses[0].probability.value(), 0.7);
        assert_eq!(hypotheses[1].risk_level, RiskLevel::High);
        assert_eq!(
            hypotheses[1].supporting_sources,
            vec!["statute-1".to_string()]
        );
    }

    #[tokio::test]
    async fn single_scenario_is_malformed() {
        let generator = ScriptedGenerator::single(
            r#"{"hypotheses": [{"scenario": "unica", "probability": 1.0, "risk_level": "low"}]}"#,
        );
        let err = generate_hypotheses(
            &generator,
            ModelTier::Premium,
            "q",
            None,
            None,
            None,
            &docs(),
            4,
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn oversized_set_is_truncated_to_max() {
        let generator = ScriptedGenerator::single(
            r#"{"hypotheses": [
                {"scenario": "a", "probability": 0.4, "risk_level": "low"},
                {"scenario": "b", "probability": 0.3, "risk_level": "low"},
                {"scenario": "c", "probability": 0.2, "risk_level": "low"},
                {"scenario": "d", "probability": 0.1, "risk_level": "low"}
            ]}"#,
        );
        let hypotheses = generate_hypotheses(
            &generator,
            ModelTier::Premium,
            "q",
            None,
            None,
            None,
            &docs(),
            3,
            false,
        )
        .await
        .unwrap();
        assert_eq!(hypotheses.len(), 3);
    }

    #[tokio::test]
    async fn unknown_risk_level_is_malformed() {
        let generator = ScriptedGenerator::single(
            r#"{"hypotheses": [
                {"scenario": "a", "probability": 0.5, "risk_level": "catastrophic"},
                {"scenario": "b", "probability": 0.5, "risk_level": "low"}
            ]}"#,
        );
        let err = generate_hypotheses(
            &generator,
            ModelTier::Premium,
            "q",
            None,
            None,
            None,
            &docs(),
            4,
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn domain_tag_is_carried_onto_hypotheses() {
        let generator = ScriptedGenerator::single(TWO_SCENARIOS);
        let hypotheses = generate_hypotheses(
            &generator,
            ModelTier::Premium,
            "q",
            None,
            None,
            Some(Domain::Vat),
            &docs(),
            4,
            false,
        )
        .await
        .unwrap();
        assert!(hypotheses.iter().all(|h| h.domain == Some(Domain::Vat)));
        assert!(generator.calls()[0].prompt.contains("VAT"));
    }
}
