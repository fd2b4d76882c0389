//! # consilium-actions
//!
//! Suggested follow-up actions via a generate-validate-regenerate loop.
//! Generated batches pass through a deterministic validator; a batch that
//! keeps too few valid actions is regenerated with the rejection reasons
//! fed back into the prompt, and when the loop is exhausted a safe
//! deterministic fallback set ships instead. The action rail is never
//! empty and never blocks the answer.

pub mod fallback;
pub mod generator;
pub mod golden_loop;
pub mod rules;
pub mod validator;

pub use fallback::safe_fallback;
pub use generator::{ActionGenerator, Correction};
pub use golden_loop::{ActionSet, GoldenLoop};
pub use validator::ActionValidator;
