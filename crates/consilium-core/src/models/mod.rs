//! Request-scoped data model.
//!
//! Everything here lives for the duration of one query and is never
//! persisted. Candidates are immutable once fetched; fused documents are
//! built once and read-only downstream.

mod action;
mod candidate;
mod conflict;
mod dual_reasoning;
mod fused;
mod hypothesis;
mod probability;
mod query;
mod reasoning_result;
mod response;
mod validation;

pub use action::{ActionType, SuggestedAction};
pub use candidate::RetrievalCandidate;
pub use conflict::{Conflict, ConflictKind};
pub use dual_reasoning::{
    ConfidenceLabel, DualReasoning, InternalTrace, ModelCallRecord, PublicCitation,
    PublicReasoning,
};
pub use fused::FusedDocument;
pub use hypothesis::{Hypothesis, RiskLevel};
pub use probability::{Confidence, Probability};
pub use query::{
    Complexity, ConversationTurn, Domain, ExpandedQuery, ModelTier, QueryRequest, QueryVariant,
    TurnRole, VariantKind,
};
pub use reasoning_result::{CrossDomainNote, ReasoningMode, ReasoningResult};
pub use response::{DegradationNote, ResponseMetadata, UnifiedResponse};
pub use validation::{ActionOutcome, BatchOutcome, RejectionReason};
