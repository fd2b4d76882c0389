//! Weighted Reciprocal Rank Fusion: score(d) = Σ_i weight_i / (k + rank_i(d)).
//!
//! Combines the per-variant ranked lists without score normalization,
//! then applies recency and authority boosts. Ties break on document ID
//! so identical inputs always fuse to an identical ordering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use consilium_core::authority::AuthorityTable;
use consilium_core::config::FusionConfig;
use consilium_core::models::{FusedDocument, RetrievalCandidate, VariantKind};

pub struct FusionRanker<'a> {
    config: &'a FusionConfig,
    authority: &'a AuthorityTable,
}

impl<'a> FusionRanker<'a> {
    pub fn new(config: &'a FusionConfig, authority: &'a AuthorityTable) -> Self {
        Self { config, authority }
    }

    /// Per-list fusion weight by variant kind.
    fn list_weight(&self, kind: VariantKind) -> f64 {
        match kind {
            VariantKind::Lexical => self.config.lexical_weight,
            VariantKind::Semantic => self.config.semantic_weight,
            VariantKind::HydeSeed => self.config.hyde_weight,
        }
    }

    /// Fuse ranked lists into the top-N boosted documents.
    pub fn fuse(
        &self,
        lists: &[(VariantKind, Vec<RetrievalCandidate>)],
        now: DateTime<Utc>,
    ) -> Vec<FusedDocument> {
        let mut scores: HashMap<String, f64> = HashMap::new();
        let mut by_id: HashMap<String, &RetrievalCandidate> = HashMap::new();

        for (kind, list) in lists {
            let weight = self.list_weight(*kind);
            for (position, candidate) in list.iter().enumerate() {
                let rank = (position + 1) as f64;
                *scores.entry(candidate.id.clone()).or_default() +=
                    weight / (self.config.rrf_k + rank);
                by_id.entry(candidate.id.clone()).or_insert(candidate);
            }
        }

        let mut fused: Vec<FusedDocument> = scores
            .into_iter()
            .filter_map(|(id, rrf_score)| {
                by_id.get(&id).map(|candidate| {
                    let boosted = rrf_score
                        * self.recency_factor(candidate, now)
                        * self.authority.boost(candidate.source_category);
                    FusedDocument {
                        candidate: (*candidate).clone(),
                        fused_score: boosted,
                        conflict_flags: Vec::new(),
                    }
                })
            })
            .collect();

        // Score descending, ID ascending on ties: deterministic ordering.
        fused.sort_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.candidate.id.cmp(&b.candidate.id))
        });
        fused.truncate(self.config.top_n);

        debug!(fused = fused.len(), "fusion complete");
        fused
    }

    /// Recency boost factor: up to `1 + recency_boost_max` for a document
    /// published today, linearly fading to 1.0 at the window edge.
    /// Undated documents are neither boosted nor penalized.
    fn recency_factor(&self, candidate: &RetrievalCandidate, now: DateTime<Utc>) -> f64 {
        let Some(age_days) = candidate.age_days(now) else {
            return 1.0;
        };
        let window = self.config.recency_window_days;
        if age_days >= window {
            return 1.0;
        }
        let freshness = 1.0 - (age_days as f64 / window as f64);
        1.0 + self.config.recency_boost_max * freshness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_core::authority::SourceCategory;
    use consilium_testkit::{candidate, candidate_dated};

    fn ranker<'a>(
        config: &'a FusionConfig,
        authority: &'a AuthorityTable,
    ) -> FusionRanker<'a> {
        FusionRanker::new(config, authority)
    }

    #[test]
    fn document_in_multiple_lists_outranks_single_list_hits() {
        let config = FusionConfig::default();
        let authority = AuthorityTable::new();
        let shared = candidate("doc-shared", "aliquota iva ordinaria", SourceCategory::Ruling);
        let only_lexical = candidate("doc-lex", "altra norma", SourceCategory::Ruling);

        let lists = vec![
            (
                VariantKind::Lexical,
                vec![only_lexical.clone(), shared.clone()],
            ),
            (VariantKind::Semantic, vec![shared.clone()]),
            (VariantKind::HydeSeed, vec![shared.clone()]),
        ];

        let fused = ranker(&config, &authority).fuse(&lists, Utc::now());
        assert_eq!(fused[0].id(), "doc-shared");
    }

    #[test]
    fn authority_boost_prefers_statute_over_circular_at_equal_rank() {
        let config = FusionConfig::default();
        let authority = AuthorityTable::new();
        let statute = candidate("doc-statute", "testo norma", SourceCategory::Statute);
        let circular = candidate(
            "doc-circular",
            "testo circolare",
            SourceCategory::AdministrativeCircular,
        );

        // Same rank in two equally-weighted positions.
        let lists = vec![
            (VariantKind::Lexical, vec![statute.clone()]),
            (VariantKind::Lexical, vec![circular.clone()]),
        ];

        let fused = ranker(&config, &authority).fuse(&lists, Utc::now());
        assert_eq!(fused[0].id(), "doc-statute");
        assert!(fused[0].fused_score > fused[1].fused_score);
    }

    #[test]
    fn recent_document_gets_boost_within_window() {
        let config = FusionConfig::default();
        let authority = AuthorityTable::new();
        let now = Utc::now();
        let recent = candidate_dated("doc-new", "novità normativa", SourceCategory::Ruling, 2026);
        let old = candidate_dated("doc-old", "vecchia prassi", SourceCategory::Ruling, 2010);

        let lists = vec![
            (VariantKind::Lexical, vec![recent.clone()]),
            (VariantKind::Lexical, vec![old.clone()]),
        ];

        let fused = ranker(&config, &authority).fuse(&lists, now);
        assert_eq!(fused[0].id(), "doc-new");
    }

    #[test]
    fn top_n_truncates_output() {
        let mut config = FusionConfig::default();
        config.top_n = 2;
        let authority = AuthorityTable::new();

        let list: Vec<_> = (0..5)
            .map(|i| candidate(&format!("doc-{i}"), "testo", SourceCategory::Ruling))
            .collect();
        let fused =
            ranker(&config, &authority).fuse(&[(VariantKind::Lexical, list)], Utc::now());
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn fusing_identical_inputs_twice_is_deterministic() {
        let config = FusionConfig::default();
        let authority = AuthorityTable::new();
        let lists = vec![(
            VariantKind::Lexical,
            vec![
                candidate("doc-a", "stesso testo identico", SourceCategory::Ruling),
                candidate("doc-b", "stesso testo identico", SourceCategory::Ruling),
                candidate("doc-c", "stesso testo identico", SourceCategory::Ruling),
            ],
        )];

        let now = Utc::now();
        let first: Vec<String> = ranker(&config, &authority)
            .fuse(&lists, now)
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        let second: Vec<String> = ranker(&config, &authority)
            .fuse(&lists, now)
            .iter()
            .map(|d| d.id().to_string())
            .collect();
        assert_eq!(first, second);
    }
}
