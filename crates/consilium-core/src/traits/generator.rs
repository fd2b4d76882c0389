use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::models::ModelTier;

/// Output contract for one generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionConstraints {
    /// Expect a single JSON object as the entire output.
    pub json: bool,
    /// Stricter contract: reject any prose around the JSON. Used on the
    /// retry after a malformed first attempt.
    pub strict: bool,
    pub max_tokens: Option<u32>,
}

impl CompletionConstraints {
    pub fn json() -> Self {
        Self {
            json: true,
            ..Self::default()
        }
    }

    pub fn strict_json() -> Self {
        Self {
            json: true,
            strict: true,
            ..Self::default()
        }
    }
}

/// Result of one generation call, with token accounting for the
/// cost tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub tokens_in: u64,
    pub tokens_out: u64,
}

/// Text-generation collaborator. One implementation may route tiers to
/// different providers.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(
        &self,
        tier: ModelTier,
        prompt: &str,
        constraints: &CompletionConstraints,
    ) -> Result<Completion, GenerationError>;
}
