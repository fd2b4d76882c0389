//! One-call facade over fan-out, fusion, and conflict detection.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use consilium_core::authority::AuthorityTable;
use consilium_core::config::FusionConfig;
use consilium_core::models::{Conflict, ExpandedQuery, FusedDocument};
use consilium_core::traits::Retriever;

use crate::conflict::ConflictDetector;
use crate::fanout;
use crate::fusion::FusionRanker;

/// Fused documents with attached conflicts, plus fan-out accounting.
#[derive(Debug)]
pub struct RetrievalOutput {
    pub documents: Vec<FusedDocument>,
    pub conflicts: Vec<Conflict>,
    pub dropped_variants: usize,
}

impl RetrievalOutput {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

pub struct HybridRetrieval {
    retriever: Arc<dyn Retriever>,
    config: FusionConfig,
    authority: Arc<AuthorityTable>,
    per_call_timeout_ms: u64,
}

impl HybridRetrieval {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        config: FusionConfig,
        authority: Arc<AuthorityTable>,
        per_call_timeout_ms: u64,
    ) -> Self {
        Self {
            retriever,
            config,
            authority,
            per_call_timeout_ms,
        }
    }

    /// Fan out the expanded variants, fuse, and scan for conflicts.
    ///
    /// An empty result is not an error here: the caller decides whether
    /// to proceed with a lowered-confidence answer.
    pub async fn run(&self, expanded: &ExpandedQuery) -> RetrievalOutput {
        let fanned = fanout::fan_out(
            Arc::clone(&self.retriever),
            &expanded.variants,
            self.config.top_k_per_variant,
            self.per_call_timeout_ms,
        )
        .await;

        if fanned.is_empty() {
            warn!("retrieval returned no candidates for any variant");
            return RetrievalOutput {
                documents: Vec::new(),
                conflicts: Vec::new(),
                dropped_variants: fanned.dropped_variants,
            };
        }

        let ranker = FusionRanker::new(&self.config, &self.authority);
        let mut documents = ranker.fuse(&fanned.lists, Utc::now());

        let detector = ConflictDetector::new(&self.authority, self.config.topic_overlap_threshold);
        let conflicts = detector.detect(&documents);
        ConflictDetector::attach(&mut documents, &conflicts);

        info!(
            documents = documents.len(),
            conflicts = conflicts.len(),
            dropped = fanned.dropped_variants,
            "hybrid retrieval complete"
        );

        RetrievalOutput {
            documents,
            conflicts,
            dropped_variants: fanned.dropped_variants,
        }
    }
}
