//! # consilium-core
//!
//! Foundation crate for the Consilium reasoning orchestrator.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod authority;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod structured;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use authority::{AuthorityTable, CaseLawTier, SourceCategory};
pub use config::OrchestratorConfig;
pub use errors::{ConsiliumError, ConsiliumResult};
pub use models::{Complexity, Confidence, Probability, RiskLevel, UnifiedResponse};
