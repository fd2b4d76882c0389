//! # consilium-reasoning
//!
//! The reasoning engine: a state machine over two modes selected by the
//! complexity classifier. Simple queries take a single linear chain;
//! complex and multi-domain queries get 2–4 competing hypotheses scored
//! on probability, aggregate source authority, and risk. The transformer
//! renders the internal trace into a user-facing explanation without a
//! second model call.

pub mod engine;
pub mod linear;
pub mod scoring;
pub mod transform;
pub mod tree;

pub use engine::{ReasoningEngine, ReasoningInput};
pub use transform::public_reasoning;
