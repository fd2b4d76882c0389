use async_trait::async_trait;

use crate::errors::ConsiliumResult;
use crate::models::{QueryVariant, RetrievalCandidate};

/// Lexical or vector retrieval backend, swappable.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Search the index with one query variant. The backend decides how to
    /// interpret the variant kind (keyword match vs. embedding search).
    async fn search(
        &self,
        variant: &QueryVariant,
        top_k: usize,
    ) -> ConsiliumResult<Vec<RetrievalCandidate>>;
}
