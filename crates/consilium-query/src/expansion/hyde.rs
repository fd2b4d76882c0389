//! Hypothetical Document Embedding (HyDE).
//!
//! Generates a hypothetical answer to the query; the retriever embeds it
//! for improved semantic search. The document is never shown to the user.
//!
//! Multi-variant mode (ambiguous follow-ups) enumerates the plausible
//! distinct scenarios instead of guessing one, and must not invent
//! concrete facts absent from the conversation. That is a correctness
//! rule: a seed with fabricated amounts or counterparty identifiers is
//! rejected outright.

use serde::Deserialize;

use consilium_core::errors::GenerationError;
use consilium_core::models::ModelTier;
use consilium_core::structured;
use consilium_core::traits::{CompletionConstraints, TextGenerator};

/// A validated hypothetical-answer seed.
#[derive(Debug, Clone)]
pub struct HydeSeed {
    pub document: String,
    /// Scenarios the document covers; empty outside multi-variant mode.
    pub variants_covered: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HydePayload {
    hypothetical_document: String,
    #[serde(default)]
    variants_covered: Vec<String>,
}

/// Generate the HyDE seed document.
pub async fn generate(
    generator: &dyn TextGenerator,
    query: &str,
    history_digest: &str,
    multi_variant: bool,
) -> Result<HydeSeed, GenerationError> {
    let prompt = if multi_variant {
        multi_variant_prompt(query, history_digest)
    } else {
        single_prompt(query, history_digest)
    };

    let completion = generator
        .complete(ModelTier::Economy, &prompt, &CompletionConstraints::json())
        .await?;
    let payload: HydePayload = structured::parse_payload(&completion.text, false)?;

    if payload.hypothetical_document.trim().is_empty() {
        return Err(GenerationError::MalformedOutput {
            reason: "empty hypothetical document".to_string(),
        });
    }

    if multi_variant {
        let context = format!("{query}\n{history_digest}");
        if introduces_fabricated_specifics(&payload.hypothetical_document, &context) {
            return Err(GenerationError::MalformedOutput {
                reason: "hypothetical document fabricates amounts not present in the conversation"
                    .to_string(),
            });
        }
    }

    Ok(HydeSeed {
        document: payload.hypothetical_document,
        variants_covered: payload.variants_covered,
    })
}

/// True when the document contains amount-like tokens (currency marks or
/// 3+ digit runs) that do not appear anywhere in the conversation.
pub fn introduces_fabricated_specifics(document: &str, context: &str) -> bool {
    document
        .split_whitespace()
        .filter(|token| looks_like_amount(token))
        .any(|token| !context.contains(token.trim_matches(|c: char| !c.is_alphanumeric())))
}

fn looks_like_amount(token: &str) -> bool {
    if token.contains('€') || token.to_lowercase().contains("euro") {
        return true;
    }
    let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
    // Short numbers (rates, article references) are fine; long runs read
    // as invented amounts or identifiers.
    digits >= 3
}

fn single_prompt(query: &str, history_digest: &str) -> String {
    let context = if history_digest.is_empty() {
        String::new()
    } else {
        format!("Conversation so far:\n{history_digest}\n")
    };
    format!(
        "{context}Write one short paragraph that an authoritative tax/legal \
         reference would contain as the answer to this query. This text seeds \
         an embedding search and is never shown to anyone.\n\
         Query: {query}\n\
         Reply with a single JSON object: {{\"hypothetical_document\": \"...\"}}."
    )
}

fn multi_variant_prompt(query: &str, history_digest: &str) -> String {
    format!(
        "Conversation so far:\n{history_digest}\n\
         The follow-up query below is ambiguous. Write one short paragraph \
         that enumerates the plausible distinct scenarios it could refer to \
         (for example business-to-business vs business-to-consumer vs \
         cross-border). Do NOT invent concrete facts: no amounts, no \
         counterparty names, no dates that are not in the conversation.\n\
         Query: {query}\n\
         Reply with a single JSON object: \
         {{\"hypothetical_document\": \"...\", \"variants_covered\": [\"...\"]}}."
    )
}
