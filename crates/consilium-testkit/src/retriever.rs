use std::collections::HashMap;

use async_trait::async_trait;

use consilium_core::errors::{ConsiliumResult, RetrievalError};
use consilium_core::models::{QueryVariant, RetrievalCandidate, VariantKind};
use consilium_core::traits::Retriever;

/// A `Retriever` serving fixed candidate lists, optionally per variant kind.
#[derive(Default)]
pub struct StaticRetriever {
    by_kind: HashMap<VariantKind, Vec<RetrievalCandidate>>,
    default: Vec<RetrievalCandidate>,
}

impl StaticRetriever {
    pub fn new(default: Vec<RetrievalCandidate>) -> Self {
        Self {
            by_kind: HashMap::new(),
            default,
        }
    }

    /// Serve a dedicated list for one variant kind.
    pub fn with_kind(mut self, kind: VariantKind, candidates: Vec<RetrievalCandidate>) -> Self {
        self.by_kind.insert(kind, candidates);
        self
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn search(
        &self,
        variant: &QueryVariant,
        top_k: usize,
    ) -> ConsiliumResult<Vec<RetrievalCandidate>> {
        let list = self.by_kind.get(&variant.kind).unwrap_or(&self.default);
        Ok(list.iter().take(top_k).cloned().collect())
    }
}

/// A `Retriever` that sleeps longer than any sane per-call timeout.
pub struct SlowRetriever {
    pub delay_ms: u64,
    pub candidates: Vec<RetrievalCandidate>,
}

#[async_trait]
impl Retriever for SlowRetriever {
    async fn search(
        &self,
        _variant: &QueryVariant,
        _top_k: usize,
    ) -> ConsiliumResult<Vec<RetrievalCandidate>> {
        tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        Ok(self.candidates.clone())
    }
}

/// A `Retriever` that always fails.
pub struct FailingRetriever;

#[async_trait]
impl Retriever for FailingRetriever {
    async fn search(
        &self,
        _variant: &QueryVariant,
        _top_k: usize,
    ) -> ConsiliumResult<Vec<RetrievalCandidate>> {
        Err(RetrievalError::SearchFailed {
            reason: "backend unavailable".to_string(),
        }
        .into())
    }
}
