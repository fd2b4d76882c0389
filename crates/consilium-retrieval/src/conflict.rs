//! Conflict detection over the fused set.
//!
//! Detection only: every conflict is reported as a record and attached to
//! both documents; resolution is the reasoning engine's job. A conflict
//! is raised when a lower-authority, older-or-equal document disagrees
//! with a higher-authority or more recent document on the same topic.

use chrono::{DateTime, Utc};
use tracing::debug;

use consilium_core::authority::AuthorityTable;
use consilium_core::models::{Conflict, ConflictKind, FusedDocument};

use crate::topic;

/// Statement polarity, used for the contradictory-content check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Affirms,
    Negates,
}

/// Markers asserting that a rule/charge applies.
const AFFIRMING_MARKERS: &[&str] = &[
    "si applica",
    "è dovuta",
    "è imponibile",
    "è obbligatorio",
    "deve essere",
    "sempre",
    "applies",
    "is due",
];

/// Markers asserting that it does not.
const NEGATING_MARKERS: &[&str] = &[
    "non si applica",
    "non è dovuta",
    "non è imponibile",
    "esent",
    "esclus",
    "esonerat",
    "mai",
    "does not apply",
    "exempt",
];

fn polarity(text: &str) -> Option<Polarity> {
    let lower = text.to_lowercase();
    if NEGATING_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(Polarity::Negates);
    }
    if AFFIRMING_MARKERS.iter().any(|m| lower.contains(m)) {
        return Some(Polarity::Affirms);
    }
    None
}

/// Two same-tier documents this far apart in time conflict temporally.
const TEMPORAL_GAP_DAYS: i64 = 365;

pub struct ConflictDetector<'a> {
    authority: &'a AuthorityTable,
    topic_threshold: f64,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(authority: &'a AuthorityTable, topic_threshold: f64) -> Self {
        Self {
            authority,
            topic_threshold,
        }
    }

    /// Scan the fused set pairwise and return all detected conflicts.
    pub fn detect(&self, docs: &[FusedDocument]) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for i in 0..docs.len() {
            for j in (i + 1)..docs.len() {
                if let Some(conflict) = self.classify_pair(&docs[i], &docs[j], conflicts.len()) {
                    conflicts.push(conflict);
                }
            }
        }
        debug!(conflicts = conflicts.len(), "conflict scan complete");
        conflicts
    }

    /// Mark each document with the conflicts it participates in.
    pub fn attach(docs: &mut [FusedDocument], conflicts: &[Conflict]) {
        for doc in docs.iter_mut() {
            for conflict in conflicts {
                if conflict.higher_id == doc.candidate.id || conflict.lower_id == doc.candidate.id
                {
                    doc.conflict_flags.push(conflict.id.clone());
                }
            }
        }
    }

    fn classify_pair(
        &self,
        a: &FusedDocument,
        b: &FusedDocument,
        next_index: usize,
    ) -> Option<Conflict> {
        if !topic::same_topic(
            &a.candidate.excerpt,
            &b.candidate.excerpt,
            self.topic_threshold,
        ) {
            return None;
        }

        let weight_a = self.authority.weight(a.candidate.source_category);
        let weight_b = self.authority.weight(b.candidate.source_category);

        // Opposing statements on the same topic contradict regardless of
        // which side outranks the other.
        if let (Some(pa), Some(pb)) = (
            polarity(&a.candidate.excerpt),
            polarity(&b.candidate.excerpt),
        ) {
            if pa != pb {
                let (higher, lower) = rank_pair(a, b, weight_a, weight_b);
                return Some(build(
                    next_index,
                    ConflictKind::Contradictory,
                    higher,
                    lower,
                    format!(
                        "'{}' and '{}' state opposite treatments for the same topic; \
                         follow '{}' unless the facts match the exception it carves out",
                        higher.candidate.title, lower.candidate.title, higher.candidate.title
                    ),
                ));
            }
        }

        // Hierarchy supersession: higher authority, not older.
        if (weight_a - weight_b).abs() > f64::EPSILON {
            let (higher, lower) = rank_pair(a, b, weight_a, weight_b);
            if !is_older(higher, lower) {
                return Some(build(
                    next_index,
                    ConflictKind::Superseded,
                    higher,
                    lower,
                    format!(
                        "'{}' is superseded by the higher-ranking '{}'; cite the latter",
                        lower.candidate.title, higher.candidate.title
                    ),
                ));
            }
            return None;
        }

        // Same tier: a large publication gap on the same topic is a
        // temporal conflict, newer side prevails.
        if let (Some(date_a), Some(date_b)) = (a.candidate.published_date, b.candidate.published_date)
        {
            if (date_a - date_b).num_days().abs() >= TEMPORAL_GAP_DAYS {
                let (higher, lower) = if date_a > date_b { (a, b) } else { (b, a) };
                return Some(build(
                    next_index,
                    ConflictKind::Temporal,
                    higher,
                    lower,
                    format!(
                        "'{}' predates '{}' on the same topic; verify it still reflects \
                         current rules",
                        lower.candidate.title, higher.candidate.title
                    ),
                ));
            }
        }

        None
    }
}

/// Higher authority wins; equal authority falls back to recency.
fn rank_pair<'d>(
    a: &'d FusedDocument,
    b: &'d FusedDocument,
    weight_a: f64,
    weight_b: f64,
) -> (&'d FusedDocument, &'d FusedDocument) {
    if (weight_a - weight_b).abs() > f64::EPSILON {
        if weight_a > weight_b {
            (a, b)
        } else {
            (b, a)
        }
    } else if date_or_min(a) >= date_or_min(b) {
        (a, b)
    } else {
        (b, a)
    }
}

fn date_or_min(doc: &FusedDocument) -> DateTime<Utc> {
    doc.candidate.published_date.unwrap_or(DateTime::UNIX_EPOCH)
}

/// Whether the higher-ranked document is strictly older than the lower.
fn is_older(higher: &FusedDocument, lower: &FusedDocument) -> bool {
    match (higher.candidate.published_date, lower.candidate.published_date) {
        (Some(h), Some(l)) => h < l,
        _ => false,
    }
}

fn build(
    index: usize,
    kind: ConflictKind,
    higher: &FusedDocument,
    lower: &FusedDocument,
    recommendation: String,
) -> Conflict {
    Conflict {
        id: format!("conflict-{index}"),
        higher_id: higher.candidate.id.clone(),
        lower_id: lower.candidate.id.clone(),
        kind,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_core::authority::SourceCategory;
    use consilium_testkit::{candidate_dated, fused};

    fn detector(authority: &AuthorityTable) -> ConflictDetector<'_> {
        ConflictDetector::new(authority, 0.3)
    }

    #[test]
    fn newer_statute_supersedes_older_circular_on_same_topic() {
        let authority = AuthorityTable::new();
        let statute = fused(
            candidate_dated(
                "statute-2023",
                "aliquota ordinaria fissata per cessioni di beni e prestazioni di servizi",
                SourceCategory::Statute,
                2023,
            ),
            1.0,
        );
        let circular = fused(
            candidate_dated(
                "circular-2021",
                "chiarimenti sull'aliquota ordinaria per cessioni di beni e prestazioni",
                SourceCategory::AdministrativeCircular,
                2021,
            ),
            0.8,
        );

        let conflicts = detector(&authority).detect(&[statute, circular]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Superseded);
        assert_eq!(conflicts[0].higher_id, "statute-2023");
        assert_eq!(conflicts[0].lower_id, "circular-2021");
    }

    #[test]
    fn same_tier_documents_on_different_topics_do_not_conflict() {
        let authority = AuthorityTable::new();
        let vat = fused(
            candidate_dated(
                "ruling-vat",
                "aliquota ordinaria cessioni di beni territorio nazionale",
                SourceCategory::Ruling,
                2023,
            ),
            1.0,
        );
        let payroll = fused(
            candidate_dated(
                "ruling-payroll",
                "trattamento fine rapporto matura annualmente dipendenti",
                SourceCategory::Ruling,
                2020,
            ),
            0.9,
        );

        assert!(detector(&authority).detect(&[vat, payroll]).is_empty());
    }

    #[test]
    fn opposing_statements_are_contradictory() {
        let authority = AuthorityTable::new();
        let affirming = fused(
            candidate_dated(
                "ruling-applies",
                "l'imposta si applica alle prestazioni di consulenza transfrontaliera",
                SourceCategory::Ruling,
                2022,
            ),
            1.0,
        );
        let negating = fused(
            candidate_dated(
                "ruling-exempt",
                "le prestazioni di consulenza transfrontaliera sono esenti dall'imposta",
                SourceCategory::Ruling,
                2023,
            ),
            0.9,
        );

        let conflicts = detector(&authority).detect(&[affirming, negating]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Contradictory);
        // Equal tier: the newer side prevails.
        assert_eq!(conflicts[0].higher_id, "ruling-exempt");
    }

    #[test]
    fn same_tier_wide_gap_is_temporal() {
        let authority = AuthorityTable::new();
        let old = fused(
            candidate_dated(
                "ruling-2015",
                "regime forfettario requisiti accesso contribuenti minori",
                SourceCategory::Ruling,
                2015,
            ),
            1.0,
        );
        let new = fused(
            candidate_dated(
                "ruling-2024",
                "regime forfettario requisiti accesso contribuenti aggiornati",
                SourceCategory::Ruling,
                2024,
            ),
            1.0,
        );

        let conflicts = detector(&authority).detect(&[old, new]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::Temporal);
        assert_eq!(conflicts[0].higher_id, "ruling-2024");
    }

    #[test]
    fn attach_marks_both_sides() {
        let authority = AuthorityTable::new();
        let mut docs = vec![
            fused(
                candidate_dated(
                    "statute-2023",
                    "aliquota ordinaria cessioni beni prestazioni servizi",
                    SourceCategory::Statute,
                    2023,
                ),
                1.0,
            ),
            fused(
                candidate_dated(
                    "circular-2021",
                    "chiarimenti aliquota ordinaria cessioni beni prestazioni",
                    SourceCategory::AdministrativeCircular,
                    2021,
                ),
                0.8,
            ),
        ];

        let conflicts = detector(&authority).detect(&docs);
        ConflictDetector::attach(&mut docs, &conflicts);
        assert_eq!(docs[0].conflict_flags, vec!["conflict-0"]);
        assert_eq!(docs[1].conflict_flags, vec!["conflict-0"]);
    }
}
