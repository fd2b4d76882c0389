/// Action generation/validation errors.
///
/// These never propagate to the caller: the golden loop and the safe
/// fallback absorb them. They exist so the loop can log precisely what
/// went wrong. Malformed batches stay `GenerationError::MalformedOutput`
/// and feed the correction prompt instead.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("validation exhausted after {attempts} regeneration attempts")]
    ValidationExhausted { attempts: u32 },
}
