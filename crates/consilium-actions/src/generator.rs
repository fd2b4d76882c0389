//! Model-backed action batch generation.
//!
//! The batch contract references hypotheses by index and sources by ID;
//! both are resolved against the reasoning output here, so an action can
//! only ever point at a hypothesis or document that actually exists.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use consilium_core::constants::MAX_SUGGESTED_ACTIONS;
use consilium_core::errors::GenerationError;
use consilium_core::models::{
    ActionType, FusedDocument, ModelTier, ReasoningResult, RejectionReason, SuggestedAction,
};
use consilium_core::structured::parse_payload;
use consilium_core::traits::{CompletionConstraints, TextGenerator};

#[derive(Debug, Deserialize)]
struct ActionPayload {
    label: String,
    #[serde(default = "default_icon")]
    icon: String,
    prompt: String,
    action_type: ActionType,
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default)]
    basis: Option<String>,
    #[serde(default)]
    hypothesis_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct BatchPayload {
    actions: Vec<ActionPayload>,
}

fn default_icon() -> String {
    "arrow-right".to_string()
}

/// What a regeneration attempt feeds back into the prompt.
#[derive(Debug, Clone, Default)]
pub struct Correction {
    pub rejections: Vec<RejectionReason>,
    pub attempt: u32,
}

pub struct ActionGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ActionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn prompt(
        &self,
        query: &str,
        reasoning: &ReasoningResult,
        documents: &[FusedDocument],
        correction: Option<&Correction>,
    ) -> String {
        let mut prompt = String::from(
            "Propose 2 to 4 follow-up actions the user can take next, each \
             executable inside this conversation. Respond with a single JSON \
             object: {\"actions\": [{\"label\": \"...\", \"icon\": \"...\", \
             \"prompt\": \"...\", \"action_type\": \"primary|alternative|risk|deepening\", \
             \"source_id\": \"...\", \"basis\": \"...\", \"hypothesis_index\": 0}]}. \
             Labels are 8-40 characters and specific; prompts are at least 25 \
             characters; every action cites a source_id from the list below; \
             never refer the user to an external professional or portal.\n",
        );

        prompt.push_str(&format!("\nQuestion: {query}\nAnswer: {}\n", reasoning.answer));
        if !reasoning.hypotheses.is_empty() {
            prompt.push_str("\nScenarios considered:\n");
            for (i, h) in reasoning.hypotheses.iter().enumerate() {
                let marker = if h.id == reasoning.selected {
                    "selected"
                } else if reasoning.surfaced_alternatives.contains(&h.id) {
                    "to rule out"
                } else {
                    "alternative"
                };
                prompt.push_str(&format!(
                    "{i}. [{marker}, {} risk] {}\n",
                    h.risk_level.label(),
                    h.scenario
                ));
            }
        }
        if !documents.is_empty() {
            prompt.push_str("\nSources:\n");
            for d in documents {
                prompt.push_str(&format!(
                    "[{}] {} ({}): {}\n",
                    d.candidate.id,
                    d.candidate.title,
                    d.candidate.source_category.label(),
                    d.candidate.excerpt
                ));
            }
        }
        if let Some(correction) = correction {
            prompt.push_str("\nThe previous batch was rejected. Fix these problems:\n");
            for reason in &correction.rejections {
                prompt.push_str(&format!("- {}\n", reason.describe()));
            }
            prompt.push_str(
                "Anchor every action to one of the source IDs listed above, \
                 using the quoted excerpts and their concrete values.\n",
            );
        }
        prompt
    }

    /// One generation call. `correction` is set on regeneration attempts;
    /// those also use the strict output contract.
    pub async fn generate_batch(
        &self,
        query: &str,
        reasoning: &ReasoningResult,
        documents: &[FusedDocument],
        correction: Option<&Correction>,
    ) -> Result<Vec<SuggestedAction>, GenerationError> {
        let strict = correction.is_some();
        let constraints = if strict {
            CompletionConstraints::strict_json()
        } else {
            CompletionConstraints::json()
        };
        let prompt = self.prompt(query, reasoning, documents, correction);
        let completion = self
            .generator
            .complete(ModelTier::Economy, &prompt, &constraints)
            .await?;
        let mut payload: BatchPayload = parse_payload(&completion.text, strict)?;
        if payload.actions.is_empty() {
            return Err(GenerationError::MalformedOutput {
                reason: "empty action batch".to_string(),
            });
        }
        if payload.actions.len() > MAX_SUGGESTED_ACTIONS {
            debug!(
                generated = payload.actions.len(),
                kept = MAX_SUGGESTED_ACTIONS,
                "oversized action batch truncated"
            );
            payload.actions.truncate(MAX_SUGGESTED_ACTIONS);
        }

        Ok(payload
            .actions
            .into_iter()
            .map(|p| {
                let mut action =
                    SuggestedAction::new(p.label, p.icon, p.prompt, p.action_type);
                action.source_basis = p.basis.unwrap_or_default();
                if let Some(id) = p.source_id {
                    if documents.iter().any(|d| d.id() == id) {
                        action.grounded_source = Some(id);
                    }
                }
                if let Some(i) = p.hypothesis_index {
                    if let Some(h) = reasoning.hypotheses.get(i) {
                        action.hypothesis_ref = Some(h.id);
                    }
                }
                action
            })
            .collect())
    }
}
