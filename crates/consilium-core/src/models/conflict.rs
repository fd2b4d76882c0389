use serde::{Deserialize, Serialize};

/// How two fused documents disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A higher-authority, newer document displaces a lower one on the
    /// same topic.
    Superseded,
    /// Opposing statements on the same topic.
    Contradictory,
    /// Same authority tier, same topic, materially different dates.
    Temporal,
}

/// A detected conflict between two fused documents.
///
/// Detection only: resolution belongs to the reasoning engine, which sees
/// the full record and decides which side to follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    /// Conflict identifier, referenced from `FusedDocument::conflict_flags`.
    pub id: String,
    /// ID of the prevailing (higher-authority or newer) document.
    pub higher_id: String,
    /// ID of the displaced (lower-authority or older) document.
    pub lower_id: String,
    pub kind: ConflictKind,
    /// What the reasoning engine should do about it, in plain words.
    pub recommendation: String,
}
