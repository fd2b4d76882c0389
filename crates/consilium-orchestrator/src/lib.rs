//! # consilium-orchestrator
//!
//! Wires the pipeline together: query analysis and complexity routing run
//! concurrently with expansion and retrieval, reasoning and action
//! generation run under the remaining deadline, and every recovery path
//! lands in the response metadata instead of an error. The only hard
//! failures `process` can return are a totally unusable generator and a
//! deadline that expires before any answer exists.

pub mod metrics;
pub mod pipeline;
pub mod retry;
pub mod telemetry;
pub mod tracked;

pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use pipeline::Orchestrator;
pub use tracked::{CallLedger, TrackedGenerator};
