/// Text-generation collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation timed out after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error("rate limited by provider")]
    RateLimited,

    #[error("malformed structured output: {reason}")]
    MalformedOutput { reason: String },

    #[error("provider failure: {reason}")]
    Provider { reason: String },
}

impl GenerationError {
    /// Whether a bounded backoff retry is worthwhile. Malformed output is
    /// not transient: it gets a stricter-contract retry at the call site,
    /// never a blind replay.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::RateLimited | Self::Provider { .. }
        )
    }
}
