/// Retrieval subsystem errors.
///
/// Only the retriever collaborator itself can fail; empty result sets
/// and fusion are handled as degradation, not errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}
