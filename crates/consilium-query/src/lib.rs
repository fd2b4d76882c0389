//! # consilium-query
//!
//! Query understanding stage of the pipeline: complexity classification
//! (cheap model call + heuristics), pure-heuristic ambiguity detection,
//! and query expansion into retrieval variants plus a HyDE seed.

pub mod ambiguity;
pub mod classifier;
pub mod domain;
pub mod expansion;
pub mod history;

pub use ambiguity::{detect_ambiguity, AmbiguityReport};
pub use classifier::{Classification, ComplexityClassifier};
pub use expansion::QueryExpander;
