//! The generate-validate-regenerate loop.
//!
//! A batch that keeps too few valid actions is regenerated with the
//! rejection reasons in the prompt, up to the configured attempt cap.
//! Validation failures regenerate; transient generation failures do not
//! (the caller's retry layer owns those), they drop straight to the safe
//! fallback. The loop never returns an empty set and never errors.

use tracing::{info, warn};

use consilium_core::config::ActionConfig;
use consilium_core::errors::ActionError;
use consilium_core::models::{FusedDocument, ReasoningResult, SuggestedAction};

use crate::fallback::safe_fallback;
use crate::generator::{ActionGenerator, Correction};
use crate::validator::ActionValidator;

/// What the loop produced, with provenance for the response metadata.
#[derive(Debug, Clone)]
pub struct ActionSet {
    pub actions: Vec<SuggestedAction>,
    /// Generation calls made, 0 when generation never succeeded.
    pub attempts: u32,
    /// True when any fallback action is present.
    pub fell_back: bool,
    /// Accepted fraction of the last validated batch.
    pub quality_score: f64,
}

pub struct GoldenLoop {
    generator: ActionGenerator,
    validator: ActionValidator,
    config: ActionConfig,
}

impl GoldenLoop {
    pub fn new(generator: ActionGenerator, config: ActionConfig) -> Self {
        Self {
            generator,
            validator: ActionValidator::new(config.clone()),
            config,
        }
    }

    pub async fn run(
        &self,
        query: &str,
        reasoning: &ReasoningResult,
        documents: &[FusedDocument],
    ) -> ActionSet {
        let mut correction: Option<Correction> = None;
        let mut attempts = 0u32;
        let mut quality_score = 0.0;

        // Attempt 1 plus up to max_regeneration_attempts corrections.
        while attempts <= self.config.max_regeneration_attempts {
            let batch = match self
                .generator
                .generate_batch(query, reasoning, documents, correction.as_ref())
                .await
            {
                Ok(batch) => batch,
                Err(err) if err.is_transient() => {
                    warn!(error = %err, "action generation unavailable, using safe fallback");
                    return self.fallback_set(reasoning, documents, attempts, quality_score);
                }
                Err(err) => {
                    // Malformed output counts as a failed attempt and gets
                    // the stricter contract on the next one.
                    warn!(error = %err, attempt = attempts + 1, "action batch malformed");
                    attempts += 1;
                    correction = Some(Correction {
                        rejections: Vec::new(),
                        attempt: attempts,
                    });
                    continue;
                }
            };
            attempts += 1;

            let outcome = self.validator.validate_batch(&batch);
            quality_score = outcome.quality_score;
            let accepted: Vec<SuggestedAction> = batch
                .into_iter()
                .zip(&outcome.outcomes)
                .filter(|(_, o)| o.accepted)
                .map(|(a, _)| a)
                .collect();

            if accepted.len() >= self.config.min_valid_actions {
                info!(
                    attempts,
                    accepted = accepted.len(),
                    quality = quality_score,
                    "action batch accepted"
                );
                return ActionSet {
                    actions: accepted,
                    attempts,
                    fell_back: false,
                    quality_score,
                };
            }

            correction = Some(Correction {
                rejections: outcome.rejection_reasons(),
                attempt: attempts,
            });
        }

        let err = ActionError::ValidationExhausted { attempts };
        warn!(error = %err, "using safe fallback actions");
        self.fallback_set(reasoning, documents, attempts, quality_score)
    }

    fn fallback_set(
        &self,
        reasoning: &ReasoningResult,
        documents: &[FusedDocument],
        attempts: u32,
        quality_score: f64,
    ) -> ActionSet {
        ActionSet {
            actions: safe_fallback(reasoning, documents),
            attempts,
            fell_back: true,
            quality_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use consilium_core::authority::SourceCategory;
    use consilium_core::models::{Confidence, Hypothesis, ReasoningMode};
    use consilium_testkit::{candidate, fused, ScriptedGenerator, ScriptedReply};

    fn reasoning() -> ReasoningResult {
        let hypothesis = Hypothesis::new("Vendita B2C in regime OSS");
        let selected = hypothesis.id;
        ReasoningResult {
            mode: ReasoningMode::Tot,
            hypotheses: vec![hypothesis],
            selected,
            selection_reasoning: String::new(),
            answer: "Si applica il regime OSS con soglia di 10.000 euro.".to_string(),
            sources_cited: vec!["statute-1".to_string()],
            surfaced_alternatives: vec![],
            cross_domain_notes: vec![],
            confidence: Confidence::new(0.8),
            degraded: false,
        }
    }

    fn docs() -> Vec<FusedDocument> {
        vec![fused(
            candidate("statute-1", "regime OSS", SourceCategory::Statute),
            1.0,
        )]
    }

    fn golden_loop(generator: Arc<ScriptedGenerator>) -> GoldenLoop {
        GoldenLoop::new(
            ActionGenerator::new(generator),
            ActionConfig::default(),
        )
    }

    const GOOD_BATCH: &str = r#"{"actions": [
        {"label": "Verifica la soglia OSS", "icon": "check-circle",
         "prompt": "Verifica se le mie vendite superano la soglia dei 10.000 euro per l'OSS.",
         "action_type": "primary", "source_id": "statute-1"},
        {"label": "Registrazione al regime OSS", "icon": "file-text",
         "prompt": "Spiega come registrarsi al regime OSS e quali dichiarazioni comporta.",
         "action_type": "deepening", "source_id": "statute-1"}
    ]}"#;

    const UNGROUNDED_BATCH: &str = r#"{"actions": [
        {"label": "Verifica la soglia OSS", "icon": "check-circle",
         "prompt": "Verifica se le mie vendite superano la soglia dei 10.000 euro per l'OSS.",
         "action_type": "primary"},
        {"label": "Registrazione al regime OSS", "icon": "file-text",
         "prompt": "Spiega come registrarsi al regime OSS e quali dichiarazioni comporta.",
         "action_type": "deepening"}
    ]}"#;

    #[tokio::test]
    async fn clean_batch_passes_on_the_first_attempt() {
        let scripted = Arc::new(ScriptedGenerator::single(GOOD_BATCH));
        let set = golden_loop(scripted.clone())
            .run("q", &reasoning(), &docs())
            .await;

        assert_eq!(set.attempts, 1);
        assert!(!set.fell_back);
        assert_eq!(set.actions.len(), 2);
        assert_eq!(scripted.call_count(), 1);
    }

    #[tokio::test]
    async fn rejected_batch_is_regenerated_with_reasons() {
        let scripted = Arc::new(ScriptedGenerator::new(vec![
            ScriptedReply::Text(UNGROUNDED_BATCH.to_string()),
            ScriptedReply::Text(GOOD_BATCH.to_string()),
        ]));
        let set = golden_loop(scripted.clone())
            .run("q", &reasoning(), &docs())
            .await;

        assert_eq!(set.attempts, 2);
        assert!(!set.fell_back);
        assert_eq!(set.actions.len(), 2);

        let second = &scripted.calls()[1];
        assert!(second.strict);
        assert!(second.prompt.contains("cites no retrieved source"));
    }

    #[tokio::test]
    async fn exhausted_loop_ships_the_safe_fallback() {
        let scripted = Arc::new(ScriptedGenerator::new(vec![
            ScriptedReply::Text(UNGROUNDED_BATCH.to_string()),
            ScriptedReply::Text(UNGROUNDED_BATCH.to_string()),
            ScriptedReply::Text(UNGROUNDED_BATCH.to_string()),
        ]));
        let set = golden_loop(scripted.clone())
            .run("q", &reasoning(), &docs())
            .await;

        assert!(set.fell_back);
        assert!(!set.actions.is_empty());
        assert!(set.actions.iter().all(|a| a.fallback));
        assert_eq!(set.attempts, 3);
    }

    #[tokio::test]
    async fn transient_failure_skips_straight_to_fallback() {
        let scripted = Arc::new(ScriptedGenerator::new(vec![ScriptedReply::Timeout]));
        let set = golden_loop(scripted.clone())
            .run("q", &reasoning(), &docs())
            .await;

        assert!(set.fell_back);
        assert!(!set.actions.is_empty());
        assert_eq!(scripted.call_count(), 1);
    }

    #[tokio::test]
    async fn partially_valid_batch_below_minimum_regenerates() {
        let one_good = r#"{"actions": [
            {"label": "Verifica la soglia OSS", "icon": "check-circle",
             "prompt": "Verifica se le mie vendite superano la soglia dei 10.000 euro per l'OSS.",
             "action_type": "primary", "source_id": "statute-1"},
            {"label": "Info", "icon": "info",
             "prompt": "Dimmi di più su questo argomento in generale.",
             "action_type": "deepening", "source_id": "statute-1"}
        ]}"#;
        let scripted = Arc::new(ScriptedGenerator::new(vec![
            ScriptedReply::Text(one_good.to_string()),
            ScriptedReply::Text(GOOD_BATCH.to_string()),
        ]));
        let set = golden_loop(scripted.clone())
            .run("q", &reasoning(), &docs())
            .await;

        assert_eq!(set.attempts, 2);
        assert_eq!(set.actions.len(), 2);
        assert!(!set.fell_back);
    }
}
