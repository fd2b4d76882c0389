use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::authority::SourceCategory;

/// A document excerpt returned by the retrieval collaborator.
///
/// Immutable once fetched; owned exclusively by one request pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    /// Stable document identifier from the index.
    pub id: String,
    /// Text excerpt, passed intact to reasoning and never summarized away.
    pub excerpt: String,
    pub source_category: SourceCategory,
    /// Human-readable title for citation rendering.
    pub title: String,
    pub published_date: Option<DateTime<Utc>>,
    pub url: Option<String>,
    /// Backend-native relevance score; only used for within-list ranking.
    pub raw_relevance_score: f64,
}

impl RetrievalCandidate {
    /// Age in days relative to `now`, or `None` when undated.
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.published_date.map(|d| (now - d).num_days().max(0))
    }
}
