/// Reasoning engine errors.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("no hypotheses produced")]
    NoHypotheses,

    #[error("answer composition failed: {reason}")]
    CompositionFailed { reason: String },
}
