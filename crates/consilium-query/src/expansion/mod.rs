//! Query expansion: paraphrase variants for lexical/semantic search plus
//! one hypothetical-answer document ("HyDE") used only as an embedding
//! seed. Ambiguous queries switch to multi-variant mode.
//!
//! Failure semantics: a failed paraphrase call leaves the original query
//! as the only lexical variant; a failed or rejected HyDE call sets
//! `hyde_skipped` and retrieval continues without the seeded list.

pub mod hyde;
pub mod paraphrase;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use consilium_core::config::ExpansionConfig;
use consilium_core::models::{ExpandedQuery, QueryVariant, VariantKind};
use consilium_core::traits::TextGenerator;

use crate::ambiguity::AmbiguityReport;

pub struct QueryExpander {
    generator: Arc<dyn TextGenerator>,
    config: ExpansionConfig,
    timeout: Duration,
}

impl QueryExpander {
    pub fn new(generator: Arc<dyn TextGenerator>, config: ExpansionConfig, timeout_ms: u64) -> Self {
        Self {
            generator,
            config,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Produce retrieval variants for a query. Always returns at least the
    /// original query as a lexical variant.
    pub async fn expand(
        &self,
        query: &str,
        history_digest: &str,
        ambiguity: &AmbiguityReport,
    ) -> ExpandedQuery {
        let mut expanded = ExpandedQuery {
            variants: vec![QueryVariant::new(query, VariantKind::Lexical)],
            multi_variant: ambiguity.ambiguous,
            ..ExpandedQuery::default()
        };

        // Paraphrases feed the plain vector list.
        let paraphrase_call = paraphrase::generate(
            self.generator.as_ref(),
            query,
            history_digest,
            self.config.max_paraphrases,
        );
        match tokio::time::timeout(self.timeout, paraphrase_call).await {
            Ok(Ok(variants)) => {
                for text in variants {
                    expanded
                        .variants
                        .push(QueryVariant::new(text, VariantKind::Semantic));
                }
            }
            Ok(Err(e)) => warn!(error = %e, "paraphrase expansion failed; lexical-only"),
            Err(_) => warn!("paraphrase expansion timed out; lexical-only"),
        }

        // HyDE seed, multi-variant when the query is ambiguous.
        let hyde_call = hyde::generate(
            self.generator.as_ref(),
            query,
            history_digest,
            ambiguity.ambiguous,
        );
        match tokio::time::timeout(self.timeout, hyde_call).await {
            Ok(Ok(seed)) => {
                expanded
                    .variants
                    .push(QueryVariant::new(seed.document, VariantKind::HydeSeed));
                expanded.variants_covered = seed.variants_covered;
            }
            Ok(Err(e)) => {
                warn!(error = %e, "hyde generation failed; skipping seed");
                expanded.hyde_skipped = true;
            }
            Err(_) => {
                warn!("hyde generation timed out; skipping seed");
                expanded.hyde_skipped = true;
            }
        }

        debug!(
            variants = expanded.variants.len(),
            multi_variant = expanded.multi_variant,
            hyde_skipped = expanded.hyde_skipped,
            "query expanded"
        );
        expanded
    }
}
