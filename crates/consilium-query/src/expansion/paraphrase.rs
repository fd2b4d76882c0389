//! Paraphrase variants for lexical/semantic retrieval.

use serde::Deserialize;

use consilium_core::errors::GenerationError;
use consilium_core::models::ModelTier;
use consilium_core::structured;
use consilium_core::traits::{CompletionConstraints, TextGenerator};

#[derive(Debug, Deserialize)]
struct ParaphrasePayload {
    variants: Vec<String>,
}

/// Ask the economy tier for up to `max` reformulations of the query.
pub async fn generate(
    generator: &dyn TextGenerator,
    query: &str,
    history_digest: &str,
    max: usize,
) -> Result<Vec<String>, GenerationError> {
    let context = if history_digest.is_empty() {
        String::new()
    } else {
        format!("Conversation so far:\n{history_digest}\n")
    };
    let prompt = format!(
        "{context}Rewrite this advisory query as up to {max} alternative search \
         formulations, preserving its meaning. Use terminology a legal/tax \
         database would contain.\n\
         Query: {query}\n\
         Reply with a single JSON object: {{\"variants\": [\"...\"]}}."
    );

    let completion = generator
        .complete(ModelTier::Economy, &prompt, &CompletionConstraints::json())
        .await?;
    let payload: ParaphrasePayload = structured::parse_payload(&completion.text, false)?;

    Ok(payload
        .variants
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .take(max)
        .collect())
}
