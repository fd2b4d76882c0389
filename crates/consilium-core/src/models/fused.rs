use serde::{Deserialize, Serialize};

use super::candidate::RetrievalCandidate;

/// A candidate after RRF fusion and authority/recency boosts.
///
/// Built once per query by the fusion ranker, read-only downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedDocument {
    pub candidate: RetrievalCandidate,
    /// Fused score after weighted RRF plus boosts (higher = more relevant).
    pub fused_score: f64,
    /// IDs of conflicts this document participates in.
    pub conflict_flags: Vec<String>,
}

impl FusedDocument {
    pub fn id(&self) -> &str {
        &self.candidate.id
    }
}
