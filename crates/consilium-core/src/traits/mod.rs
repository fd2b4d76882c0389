//! Narrow interfaces to external collaborators.
//!
//! The orchestrator consumes a retrieval service and one or more text
//! generation services; both are network-bound, so the traits are async
//! and object-safe. Implementations live outside this workspace.

mod client_context;
mod cost_tracker;
mod generator;
mod retriever;

pub use client_context::{ClientContext, ClientProfile};
pub use cost_tracker::{CostTracker, NoopCostTracker};
pub use generator::{Completion, CompletionConstraints, TextGenerator};
pub use retriever::Retriever;
