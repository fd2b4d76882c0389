//! Error taxonomy for the orchestrator.
//!
//! One enum per fallible subsystem; `ConsiliumError` is the umbrella type
//! crossing crate boundaries. Most failures are recovered inside the
//! pipeline and only surface as degradation metadata; the hard-failure
//! cases are total generation failure and a deadline expiring before any
//! answer exists. Query understanding has no error type at all: every
//! failure there lands on a fail-safe default.

mod action_error;
mod generation_error;
mod reasoning_error;
mod retrieval_error;

pub use action_error::ActionError;
pub use generation_error::GenerationError;
pub use reasoning_error::ReasoningError;
pub use retrieval_error::RetrievalError;

/// Umbrella error for the whole orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ConsiliumError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("deadline exceeded before an answer was produced")]
    DeadlineExceeded,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ConsiliumResult<T> = Result<T, ConsiliumError>;
