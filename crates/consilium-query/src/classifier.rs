//! Complexity classification: economy-tier model call with a constrained
//! output contract, plus light heuristics.
//!
//! Fail-safe: malformed output or a blown latency budget defaults to
//! `simple`, the cheapest path, never an expensive one. The call runs
//! concurrently with ambiguity detection and never blocks retrieval.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use consilium_core::models::{Complexity, Domain, ModelTier};
use consilium_core::structured;
use consilium_core::traits::{CompletionConstraints, TextGenerator};

/// Classifier verdict. Infallible by construction: every failure path
/// lands on the fail-safe default.
#[derive(Debug, Clone)]
pub struct Classification {
    pub complexity: Complexity,
    pub reasoning: String,
    /// True when the fail-safe default fired instead of the model.
    pub degraded: bool,
}

impl Classification {
    fn fail_safe(reason: &str) -> Self {
        Self {
            complexity: Complexity::Simple,
            reasoning: format!("classifier unavailable ({reason}); defaulted to simple"),
            degraded: true,
        }
    }
}

/// Constrained output contract for the classifier call.
#[derive(Debug, Deserialize)]
struct ClassifierPayload {
    complexity: String,
    #[serde(default)]
    reasoning: String,
}

pub struct ComplexityClassifier {
    generator: Arc<dyn TextGenerator>,
    budget_ms: u64,
}

impl ComplexityClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>, budget_ms: u64) -> Self {
        Self {
            generator,
            budget_ms,
        }
    }

    /// Label a query `simple | complex | multi_domain`.
    pub async fn classify(
        &self,
        query: &str,
        domains: &[Domain],
        has_history: bool,
        has_attachments: bool,
    ) -> Classification {
        let prompt = build_prompt(query, domains, has_history, has_attachments);
        let constraints = CompletionConstraints::json();
        let call = self
            .generator
            .complete(ModelTier::Economy, &prompt, &constraints);

        let completion = match tokio::time::timeout(Duration::from_millis(self.budget_ms), call)
            .await
        {
            Ok(Ok(completion)) => completion,
            Ok(Err(e)) => {
                warn!(error = %e, "classifier call failed");
                return Classification::fail_safe("call failed");
            }
            Err(_) => {
                warn!(budget_ms = self.budget_ms, "classifier call timed out");
                return Classification::fail_safe("timeout");
            }
        };

        let payload: ClassifierPayload = match structured::parse_payload(&completion.text, false) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "classifier output malformed");
                return Classification::fail_safe("malformed output");
            }
        };

        let Some(mut complexity) = parse_complexity(&payload.complexity) else {
            warn!(label = %payload.complexity, "classifier returned unknown label");
            return Classification::fail_safe("unknown label");
        };

        // Light heuristic: a simple verdict with attachments spanning
        // several domains is optimistic.
        if complexity == Complexity::Simple && domains.len() >= 2 && has_attachments {
            complexity = Complexity::Complex;
        }

        debug!(?complexity, domains = domains.len(), "query classified");
        Classification {
            complexity,
            reasoning: payload.reasoning,
            degraded: false,
        }
    }
}

fn parse_complexity(label: &str) -> Option<Complexity> {
    match label.trim().to_lowercase().as_str() {
        "simple" => Some(Complexity::Simple),
        "complex" => Some(Complexity::Complex),
        "multi_domain" | "multidomain" | "multi-domain" => Some(Complexity::MultiDomain),
        _ => None,
    }
}

fn build_prompt(
    query: &str,
    domains: &[Domain],
    has_history: bool,
    has_attachments: bool,
) -> String {
    let domain_list = if domains.is_empty() {
        "none detected".to_string()
    } else {
        domains
            .iter()
            .map(|d| d.label())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Classify the complexity of this professional advisory query.\n\
         Query: {query}\n\
         Detected domains: {domain_list}\n\
         Has conversation history: {has_history}\n\
         Has attachments: {has_attachments}\n\
         Reply with a single JSON object: \
         {{\"complexity\": \"simple\" | \"complex\" | \"multi_domain\", \"reasoning\": \"...\"}}.\n\
         Use \"simple\" for single-fact lookups, \"complex\" for queries needing \
         scenario analysis, \"multi_domain\" when several advisory domains interact."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_testkit::{ScriptedGenerator, ScriptedReply};

    fn classifier(generator: ScriptedGenerator, budget_ms: u64) -> ComplexityClassifier {
        ComplexityClassifier::new(Arc::new(generator), budget_ms)
    }

    #[tokio::test]
    async fn well_formed_verdict_is_used() {
        let c = classifier(
            ScriptedGenerator::single(r#"{"complexity": "complex", "reasoning": "scenario analysis needed"}"#),
            500,
        );
        let result = c.classify("Come fatturare consulenza a azienda tedesca?", &[Domain::Vat, Domain::International], false, false).await;
        assert_eq!(result.complexity, Complexity::Complex);
        assert!(!result.degraded);
    }

    #[tokio::test]
    async fn malformed_output_defaults_to_simple() {
        let c = classifier(ScriptedGenerator::single("definitely complex, trust me"), 500);
        let result = c.classify("query", &[], false, false).await;
        assert_eq!(result.complexity, Complexity::Simple);
        assert!(result.degraded);
    }

    #[tokio::test]
    async fn unknown_label_defaults_to_simple() {
        let c = classifier(
            ScriptedGenerator::single(r#"{"complexity": "medium", "reasoning": ""}"#),
            500,
        );
        let result = c.classify("query", &[], false, false).await;
        assert_eq!(result.complexity, Complexity::Simple);
        assert!(result.degraded);
    }

    #[tokio::test]
    async fn blown_budget_defaults_to_simple_not_expensive() {
        let generator = ScriptedGenerator::single(r#"{"complexity": "multi_domain"}"#)
            .with_delay_ms(200);
        let c = classifier(generator, 20);
        let result = c.classify("query", &[], false, false).await;
        assert_eq!(result.complexity, Complexity::Simple);
        assert!(result.degraded);
    }

    #[tokio::test]
    async fn provider_failure_defaults_to_simple() {
        let c = classifier(
            ScriptedGenerator::new(vec![ScriptedReply::Provider("boom".into())]),
            500,
        );
        let result = c.classify("query", &[], false, false).await;
        assert_eq!(result.complexity, Complexity::Simple);
        assert!(result.degraded);
    }

    #[tokio::test]
    async fn simple_verdict_with_multi_domain_attachments_upgrades() {
        let c = classifier(
            ScriptedGenerator::single(r#"{"complexity": "simple", "reasoning": ""}"#),
            500,
        );
        let result = c
            .classify(
                "query",
                &[Domain::Vat, Domain::Payroll],
                true,
                true,
            )
            .await;
        assert_eq!(result.complexity, Complexity::Complex);
    }
}
