//! Linear chain-of-thought composition for simple queries.
//!
//! One model call composes the answer against the top fused documents.
//! Citations come back as document IDs and are filtered against the
//! retrieved set, so the answer can never cite a document that was not
//! actually found.

use serde::Deserialize;

use consilium_core::errors::GenerationError;
use consilium_core::models::{FusedDocument, ModelTier};
use consilium_core::structured::parse_payload;
use consilium_core::traits::{CompletionConstraints, TextGenerator};

/// Documents shown to the composer, the best-ranked first.
const CONTEXT_DOCUMENTS: usize = 3;

#[derive(Debug, Deserialize)]
struct ComposePayload {
    answer: String,
    #[serde(default)]
    source_ids: Vec<String>,
}

/// A composed answer with citations already validated.
#[derive(Debug, Clone)]
pub struct ComposedAnswer {
    pub answer: String,
    pub sources_cited: Vec<String>,
}

fn document_block(documents: &[FusedDocument]) -> String {
    documents
        .iter()
        .take(CONTEXT_DOCUMENTS)
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

fn compose_prompt(
    query: &str,
    history_digest: Option<&str>,
    client_notes: Option<&str>,
    scenario: Option<&str>,
    documents: &[FusedDocument],
) -> String {
    let mut prompt = String::from(
        "Answer the user's tax question using only the sources below. \
         Respond with a single JSON object: \
         {\"answer\": \"...\", \"source_ids\": [\"...\"]}. \
         Cite only the IDs of sources the answer actually relies on.\n",
    );
    if let Some(digest) = history_digest {
        prompt.push_str(&format!("\nConversation so far:\n{digest}\n"));
    }
    if let Some(notes) = client_notes {
        prompt.push_str(&format!("\nClient context:\n{notes}\n"));
    }
    if let Some(scenario) = scenario {
        prompt.push_str(&format!("\nAnswer for this scenario:\n{scenario}\n"));
    }
    if documents.is_empty() {
        prompt.push_str(
            "\nNo sources were retrieved. Answer from general principles, \
             say so explicitly, and leave source_ids empty.\n",
        );
    } else {
        prompt.push_str(&format!("\nSources:\n{}\n", document_block(documents)));
    }
    prompt.push_str(&format!("\nQuestion: {query}\n"));
    prompt
}

/// One composition call. `scenario` narrows the answer to a selected
/// hypothesis in tree mode; `None` in plain linear mode.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn compose(
    generator: &dyn TextGenerator,
    tier: ModelTier,
    query: &str,
    history_digest: Option<&str>,
    client_notes: Option<&str>,
    scenario: Option<&str>,
    documents: &[FusedDocument],
    strict: bool,
) -> Result<ComposedAnswer, GenerationError> {
    let prompt = compose_prompt(query, history_digest, client_notes, scenario, documents);
    let constraints = if strict {
        CompletionConstraints::strict_json()
    } else {
        CompletionConstraints::json()
    };
    let completion = generator.complete(tier, &prompt, &constraints).await?;
    let payload: ComposePayload = parse_payload(&completion.text, strict)?;

    let sources_cited = payload
        .source_ids
        .into_iter()
        .filter(|id| documents.iter().any(|d| d.id() == id))
        .collect();

    Ok(ComposedAnswer {
        answer: payload.answer,
        sources_cited,
    })
}

/// Deterministic composition used when every model attempt failed but
/// retrieval produced usable documents. Quotes the best-ranked excerpts
/// rather than returning nothing.
pub(crate) fn compose_deterministic(
    scenario: Option<&str>,
    documents: &[FusedDocument],
) -> ComposedAnswer {
    let shown: Vec<&FusedDocument> = documents.iter().take(CONTEXT_DOCUMENTS).collect();
    let mut answer = String::new();
    if let Some(scenario) = scenario {
        answer.push_str(&format!("Most applicable scenario: {scenario}\n\n"));
    }
    answer.push_str("A full answer could not be composed. The most relevant sources found:\n");
    for doc in &shown {
        answer.push_str(&format!(
            "- {} ({}): {}\n",
            doc.candidate.title,
            doc.candidate.source_category.label(),
            doc.candidate.excerpt
        ));
    }
    ComposedAnswer {
        answer,
        sources_cited: shown.iter().map(|d| d.id().to_string()).collect(),
    }
}
