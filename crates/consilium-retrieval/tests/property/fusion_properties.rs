//! Property tests for the fusion ranker.

use chrono::Utc;
use proptest::prelude::*;

use consilium_core::authority::{AuthorityTable, SourceCategory};
use consilium_core::config::FusionConfig;
use consilium_core::models::{RetrievalCandidate, VariantKind};
use consilium_retrieval::FusionRanker;

fn make_candidate(id: u8) -> RetrievalCandidate {
    RetrievalCandidate {
        id: format!("doc-{id}"),
        excerpt: format!("excerpt for document {id}"),
        source_category: SourceCategory::Ruling,
        title: format!("Ruling doc-{id}"),
        published_date: None,
        url: None,
        raw_relevance_score: 1.0,
    }
}

fn candidate_lists() -> impl Strategy<Value = Vec<(VariantKind, Vec<RetrievalCandidate>)>> {
    let list = prop::collection::vec(0u8..20, 0..10);
    prop::collection::vec(list, 1..4).prop_map(|lists| {
        let kinds = [
            VariantKind::Lexical,
            VariantKind::Semantic,
            VariantKind::HydeSeed,
        ];
        lists
            .into_iter()
            .enumerate()
            .map(|(i, ids)| {
                let mut seen = std::collections::HashSet::new();
                let candidates = ids
                    .into_iter()
                    .filter(|id| seen.insert(*id))
                    .map(make_candidate)
                    .collect();
                (kinds[i % kinds.len()], candidates)
            })
            .collect()
    })
}

proptest! {
    /// Fusing identical inputs twice yields identical ordering.
    #[test]
    fn fusion_is_deterministic(lists in candidate_lists()) {
        let config = FusionConfig::default();
        let authority = AuthorityTable::new();
        let ranker = FusionRanker::new(&config, &authority);
        let now = Utc::now();

        let first: Vec<(String, f64)> = ranker
            .fuse(&lists, now)
            .into_iter()
            .map(|d| (d.candidate.id, d.fused_score))
            .collect();
        let second: Vec<(String, f64)> = ranker
            .fuse(&lists, now)
            .into_iter()
            .map(|d| (d.candidate.id, d.fused_score))
            .collect();

        prop_assert_eq!(first, second);
    }

    /// Fused scores come out monotonically non-increasing.
    #[test]
    fn fused_scores_are_sorted(lists in candidate_lists()) {
        let config = FusionConfig::default();
        let authority = AuthorityTable::new();
        let ranker = FusionRanker::new(&config, &authority);

        let fused = ranker.fuse(&lists, Utc::now());
        for window in fused.windows(2) {
            prop_assert!(window[0].fused_score >= window[1].fused_score);
        }
    }

    /// Output never exceeds the configured top-N.
    #[test]
    fn output_respects_top_n(lists in candidate_lists(), top_n in 1usize..8) {
        let mut config = FusionConfig::default();
        config.top_n = top_n;
        let authority = AuthorityTable::new();
        let ranker = FusionRanker::new(&config, &authority);

        prop_assert!(ranker.fuse(&lists, Utc::now()).len() <= top_n);
    }
}
