//! Mode selection and the reasoning state machine.
//!
//! The complexity class picks the mode: simple queries run one linear
//! composition on the economy tier, complex queries run tree-of-thought
//! on the premium tier, multi-domain queries run one hypothesis pass per
//! domain and reconcile. Every failure path degrades instead of erroring:
//! a persistently malformed hypothesis set falls back to linear mode, a
//! failed composition falls back to a deterministic answer built from the
//! retrieved excerpts. The engine returns a hard error only when it has
//! neither a model answer nor a document to quote.

use std::sync::Arc;

use tracing::warn;

use consilium_core::authority::AuthorityTable;
use consilium_core::config::ReasoningConfig;
use consilium_core::errors::{ConsiliumResult, GenerationError, ReasoningError};
use consilium_core::models::{
    Complexity, Confidence, CrossDomainNote, Domain, FusedDocument, Hypothesis, ModelTier,
    Probability, ReasoningMode, ReasoningResult,
};
use consilium_core::traits::TextGenerator;

use crate::linear::{self, ComposedAnswer};
use crate::scoring;
use crate::tree;

/// Everything the engine needs for one query. Assembled by the pipeline
/// from the classifier, query analysis, and retrieval outputs.
#[derive(Debug, Clone)]
pub struct ReasoningInput {
    pub query: String,
    pub history_digest: Option<String>,
    pub client_notes: Option<String>,
    pub complexity: Complexity,
    pub domains: Vec<Domain>,
    pub documents: Vec<FusedDocument>,
}

pub struct ReasoningEngine {
    generator: Arc<dyn TextGenerator>,
    authority: Arc<AuthorityTable>,
    config: ReasoningConfig,
}

impl ReasoningEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        authority: Arc<AuthorityTable>,
        config: ReasoningConfig,
    ) -> Self {
        Self {
            generator,
            authority,
            config,
        }
    }

    pub async fn reason(&self, input: &ReasoningInput) -> ConsiliumResult<ReasoningResult> {
        match input.complexity {
            Complexity::Simple => self.run_linear(input, false).await,
            Complexity::Complex => self.run_tree(input).await,
            Complexity::MultiDomain => self.run_multi_domain(input).await,
        }
    }

    /// Compose with a stricter-contract retry on malformed output.
    async fn compose_with_retry(
        &self,
        tier: ModelTier,
        input: &ReasoningInput,
        scenario: Option<&str>,
    ) -> Result<ComposedAnswer, GenerationError> {
        let first = linear::compose(
            self.generator.as_ref(),
            tier,
            &input.query,
            input.history_digest.as_deref(),
            input.client_notes.as_deref(),
            scenario,
            &input.documents,
            false,
        )
        .await;
        match first {
            Err(GenerationError::MalformedOutput { reason }) => {
                warn!(%reason, "composition output malformed, retrying with strict contract");
                linear::compose(
                    self.generator.as_ref(),
                    tier,
                    &input.query,
                    input.history_digest.as_deref(),
                    input.client_notes.as_deref(),
                    scenario,
                    &input.documents,
                    true,
                )
                .await
            }
            other => other,
        }
    }

    /// Single-hypothesis linear chain. `pre_degraded` marks a mode
    /// downgrade that already happened upstream.
    async fn run_linear(
        &self,
        input: &ReasoningInput,
        pre_degraded: bool,
    ) -> ConsiliumResult<ReasoningResult> {
        let mut degraded = pre_degraded || input.documents.is_empty();

        let composed = match self.compose_with_retry(ModelTier::Economy, input, None).await {
            Ok(composed) => composed,
            Err(err) if !input.documents.is_empty() => {
                warn!(error = %err, "linear composition failed, quoting retrieved excerpts");
                degraded = true;
                linear::compose_deterministic(None, &input.documents)
            }
            Err(err) => {
                return Err(ReasoningError::CompositionFailed {
                    reason: err.to_string(),
                }
                .into())
            }
        };

        let mut hypothesis = Hypothesis::new("Direct reading of the cited sources");
        hypothesis.probability = Probability::new(0.9);
        hypothesis.supporting_sources = composed.sources_cited.clone();
        let mut hypotheses = vec![hypothesis];
        scoring::score_all(
            &mut hypotheses,
            &input.documents,
            &self.authority,
            &self.config,
        );
        let selected = hypotheses[0].id;

        let base = if composed.sources_cited.is_empty() {
            Confidence::new(0.6)
        } else {
            Confidence::new(0.85)
        };
        let confidence = if degraded { base.lowered() } else { base };

        Ok(ReasoningResult {
            mode: ReasoningMode::Cot,
            hypotheses,
            selected,
            selection_reasoning: "single scenario, no competitors to weigh".to_string(),
            answer: composed.answer,
            sources_cited: composed.sources_cited,
            surfaced_alternatives: Vec::new(),
            cross_domain_notes: Vec::new(),
            confidence,
            degraded,
        })
    }

    /// Hypothesis generation with a stricter-contract retry. A set that is
    /// still malformed after the retry surfaces as `MalformedOutput` so the
    /// caller can downgrade the mode.
    async fn hypotheses_with_retry(
        &self,
        input: &ReasoningInput,
        domain: Option<Domain>,
    ) -> Result<Vec<Hypothesis>, GenerationError> {
        let first = tree::generate_hypotheses(
            self.generator.as_ref(),
            ModelTier::Premium,
            &input.query,
            input.history_digest.as_deref(),
            input.client_notes.as_deref(),
            domain,
            &input.documents,
            self.config.max_hypotheses,
            false,
        )
        .await;
        match first {
            Err(GenerationError::MalformedOutput { reason }) => {
                warn!(%reason, "hypothesis set malformed, retrying with strict contract");
                tree::generate_hypotheses(
                    self.generator.as_ref(),
                    ModelTier::Premium,
                    &input.query,
                    input.history_digest.as_deref(),
                    input.client_notes.as_deref(),
                    domain,
                    &input.documents,
                    self.config.max_hypotheses,
                    true,
                )
                .await
            }
            other => other,
        }
    }

    async fn run_tree(&self, input: &ReasoningInput) -> ConsiliumResult<ReasoningResult> {
        let hypotheses = match self.hypotheses_with_retry(input, None).await {
            Ok(hypotheses) => hypotheses,
            Err(err) => {
                warn!(error = %err, "tree mode unavailable, downgrading to linear");
                return self.run_linear(input, true).await;
            }
        };
        self.finish_tree(input, hypotheses, ReasoningMode::Tot, Vec::new())
            .await
    }

    async fn run_multi_domain(&self, input: &ReasoningInput) -> ConsiliumResult<ReasoningResult> {
        if input.domains.len() < 2 {
            return self.run_tree(input).await;
        }

        let mut all = Vec::new();
        let mut any_failed = false;
        for &domain in &input.domains {
            match self.hypotheses_with_retry(input, Some(domain)).await {
                Ok(mut hypotheses) => all.append(&mut hypotheses),
                Err(err) => {
                    warn!(domain = domain.label(), error = %err, "domain pass failed, continuing without it");
                    any_failed = true;
                }
            }
        }
        if all.is_empty() {
            warn!("every domain pass failed, downgrading to linear");
            return self.run_linear(input, true).await;
        }

        let notes = cross_domain_notes(&all, &input.domains, &self.config, &self.authority, &input.documents);
        let mut result = self
            .finish_tree(input, all, ReasoningMode::TotMultiDomain, notes)
            .await?;
        if any_failed {
            result.degraded = true;
            result.confidence = result.confidence.lowered();
        }
        Ok(result)
    }

    /// Shared tail of both tree modes: score, select, surface, compose.
    async fn finish_tree(
        &self,
        input: &ReasoningInput,
        mut hypotheses: Vec<Hypothesis>,
        mode: ReasoningMode,
        cross_domain_notes: Vec<CrossDomainNote>,
    ) -> ConsiliumResult<ReasoningResult> {
        if hypotheses.is_empty() {
            return Err(ReasoningError::NoHypotheses.into());
        }

        scoring::score_all(
            &mut hypotheses,
            &input.documents,
            &self.authority,
            &self.config,
        );
        let selected_idx = scoring::select(&hypotheses);
        let surfaced =
            scoring::surface_alternatives(&hypotheses, selected_idx, &self.config.surfacing);
        let selected = hypotheses[selected_idx].clone();

        let mut degraded = false;
        let composed = match self
            .compose_with_retry(ModelTier::Premium, input, Some(&selected.scenario))
            .await
        {
            Ok(composed) => composed,
            Err(err) => {
                warn!(error = %err, "scenario composition failed, quoting retrieved excerpts");
                degraded = true;
                linear::compose_deterministic(Some(&selected.scenario), &input.documents)
            }
        };

        let selection_reasoning = format!(
            "selected '{}' with weighted score {:.2} (probability {}, source weight {:.2}, {} risk) over {} competitor(s)",
            selected.scenario,
            selected.final_score,
            selected.probability,
            selected.source_weight,
            selected.risk_level.label(),
            hypotheses.len() - 1,
        );

        let base = Confidence::new(0.4 + 0.5 * selected.final_score);
        let confidence = if degraded { base.lowered() } else { base };

        Ok(ReasoningResult {
            mode,
            selected: selected.id,
            hypotheses,
            selection_reasoning,
            answer: composed.answer,
            sources_cited: composed.sources_cited,
            surfaced_alternatives: surfaced,
            cross_domain_notes,
            confidence,
            degraded,
        })
    }
}

/// Reconciliation notes for domains whose best scenarios disagree on risk.
fn cross_domain_notes(
    hypotheses: &[Hypothesis],
    domains: &[Domain],
    config: &ReasoningConfig,
    authority: &AuthorityTable,
    documents: &[FusedDocument],
) -> Vec<CrossDomainNote> {
    let best_for = |domain: Domain| -> Option<&Hypothesis> {
        hypotheses
            .iter()
            .filter(|h| h.domain == Some(domain))
            .max_by(|a, b| {
                let sa = scoring::final_score(config, &with_weight(a, documents, authority));
                let sb = scoring::final_score(config, &with_weight(b, documents, authority));
                sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
            })
    };

    let mut notes = Vec::new();
    for (i, &a) in domains.iter().enumerate() {
        for &b in &domains[i + 1..] {
            let (Some(ha), Some(hb)) = (best_for(a), best_for(b)) else {
                continue;
            };
            if ha.risk_level != hb.risk_level {
                notes.push(CrossDomainNote {
                    domains: (a, b),
                    note: format!(
                        "The {} analysis carries {} risk while the {} analysis carries {} risk; the stricter reading should govern until reconciled.",
                        a.label(),
                        ha.risk_level.label(),
                        b.label(),
                        hb.risk_level.label(),
                    ),
                });
            }
        }
    }
    notes
}

fn with_weight(
    hypothesis: &Hypothesis,
    documents: &[FusedDocument],
    authority: &AuthorityTable,
) -> Hypothesis {
    let mut h = hypothesis.clone();
    h.source_weight = scoring::source_weight(&h.supporting_sources, documents, authority);
    h
}
