//! Scripted collaborators and document builders for the test suites.
//!
//! Nothing here ships in production builds; every other crate pulls this
//! in as a dev-dependency only.

mod docs;
mod generator;
mod retriever;
mod tracker;

pub use docs::{candidate, candidate_dated, fused};
pub use generator::{ScriptedGenerator, ScriptedReply};
pub use retriever::{FailingRetriever, SlowRetriever, StaticRetriever};
pub use tracker::CountingCostTracker;
