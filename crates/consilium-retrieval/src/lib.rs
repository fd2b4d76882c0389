//! # consilium-retrieval
//!
//! Hybrid retrieval: fan the expanded query variants out against the
//! retrieval collaborator in parallel, merge the ranked lists with
//! weighted Reciprocal Rank Fusion, apply authority/recency boosts, and
//! scan the fused set for source conflicts.
//!
//! Nothing is summarized away here: the top-N fused documents flow
//! downstream with full excerpts and attached conflicts.

pub mod conflict;
pub mod fanout;
pub mod fusion;
pub mod hybrid;
pub mod topic;

pub use conflict::ConflictDetector;
pub use fanout::{fan_out, FanoutResult};
pub use fusion::FusionRanker;
pub use hybrid::{HybridRetrieval, RetrievalOutput};
