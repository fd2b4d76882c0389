use chrono::{TimeZone, Utc};

use consilium_core::authority::SourceCategory;
use consilium_core::models::{FusedDocument, RetrievalCandidate};

/// Build an undated candidate with a neutral relevance score.
pub fn candidate(id: &str, excerpt: &str, category: SourceCategory) -> RetrievalCandidate {
    RetrievalCandidate {
        id: id.to_string(),
        excerpt: excerpt.to_string(),
        source_category: category,
        title: format!("{} {}", category.label(), id),
        published_date: None,
        url: None,
        raw_relevance_score: 1.0,
    }
}

/// Build a candidate published on Jan 1 of the given year.
pub fn candidate_dated(
    id: &str,
    excerpt: &str,
    category: SourceCategory,
    year: i32,
) -> RetrievalCandidate {
    let mut c = candidate(id, excerpt, category);
    c.published_date = Some(Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap());
    c
}

/// Wrap a candidate as a fused document with a given score.
pub fn fused(candidate: RetrievalCandidate, fused_score: f64) -> FusedDocument {
    FusedDocument {
        candidate,
        fused_score,
        conflict_flags: Vec::new(),
    }
}
