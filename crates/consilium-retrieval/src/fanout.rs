//! Parallel retrieval fan-out with per-call timeouts.
//!
//! Every variant is issued concurrently; the join completes when all
//! calls finish or time out. A variant that times out or errors is
//! dropped rather than retried, and never fails the whole query.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use consilium_core::models::{QueryVariant, RetrievalCandidate, VariantKind};
use consilium_core::traits::Retriever;

/// Ranked lists per variant, in variant order, plus drop accounting.
#[derive(Debug, Default)]
pub struct FanoutResult {
    pub lists: Vec<(VariantKind, Vec<RetrievalCandidate>)>,
    pub dropped_variants: usize,
}

impl FanoutResult {
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(|(_, l)| l.is_empty())
    }
}

/// Issue all variants against the retriever concurrently.
pub async fn fan_out(
    retriever: Arc<dyn Retriever>,
    variants: &[QueryVariant],
    top_k: usize,
    per_call_timeout_ms: u64,
) -> FanoutResult {
    let timeout = Duration::from_millis(per_call_timeout_ms);
    let mut set = JoinSet::new();

    for (index, variant) in variants.iter().cloned().enumerate() {
        let retriever = Arc::clone(&retriever);
        set.spawn(async move {
            let kind = variant.kind;
            let outcome = tokio::time::timeout(timeout, retriever.search(&variant, top_k)).await;
            (index, kind, outcome)
        });
    }

    let mut collected: Vec<(usize, VariantKind, Vec<RetrievalCandidate>)> = Vec::new();
    let mut dropped = 0usize;

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, kind, Ok(Ok(candidates)))) => collected.push((index, kind, candidates)),
            Ok((_, kind, Ok(Err(e)))) => {
                warn!(?kind, error = %e, "variant search failed; dropping");
                dropped += 1;
            }
            Ok((_, kind, Err(_))) => {
                warn!(?kind, timeout_ms = per_call_timeout_ms, "variant search timed out; dropping");
                dropped += 1;
            }
            Err(e) => {
                warn!(error = %e, "variant search task panicked; dropping");
                dropped += 1;
            }
        }
    }

    // Restore variant order so fusion input is deterministic regardless
    // of completion order.
    collected.sort_by_key(|(index, _, _)| *index);

    debug!(
        lists = collected.len(),
        dropped, "retrieval fan-out complete"
    );

    FanoutResult {
        lists: collected
            .into_iter()
            .map(|(_, kind, list)| (kind, list))
            .collect(),
        dropped_variants: dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_core::authority::SourceCategory;
    use consilium_testkit::{candidate, FailingRetriever, SlowRetriever, StaticRetriever};

    fn variant(text: &str, kind: VariantKind) -> QueryVariant {
        QueryVariant::new(text, kind)
    }

    #[tokio::test]
    async fn all_variants_return_lists_in_order() {
        let retriever = Arc::new(StaticRetriever::new(vec![candidate(
            "doc-1",
            "aliquota ordinaria",
            SourceCategory::Statute,
        )]));
        let variants = vec![
            variant("aliquota iva", VariantKind::Lexical),
            variant("percentuale iva standard", VariantKind::Semantic),
        ];

        let result = fan_out(retriever, &variants, 10, 1_000).await;
        assert_eq!(result.lists.len(), 2);
        assert_eq!(result.lists[0].0, VariantKind::Lexical);
        assert_eq!(result.lists[1].0, VariantKind::Semantic);
        assert_eq!(result.dropped_variants, 0);
    }

    #[tokio::test]
    async fn timed_out_variant_is_dropped_not_fatal() {
        let retriever = Arc::new(SlowRetriever {
            delay_ms: 500,
            candidates: vec![],
        });
        let variants = vec![variant("aliquota iva", VariantKind::Lexical)];

        let result = fan_out(retriever, &variants, 10, 20).await;
        assert!(result.lists.is_empty());
        assert_eq!(result.dropped_variants, 1);
    }

    #[tokio::test]
    async fn failing_backend_drops_variant() {
        let result = fan_out(
            Arc::new(FailingRetriever),
            &[variant("aliquota iva", VariantKind::Lexical)],
            10,
            1_000,
        )
        .await;
        assert!(result.is_empty());
        assert_eq!(result.dropped_variants, 1);
    }
}
