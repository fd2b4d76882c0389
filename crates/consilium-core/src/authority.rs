//! Source hierarchy: legal/administrative category → authority weight.
//!
//! Default weights are hardcoded; case-law sub-tiers can be overridden via
//! TOML config. A weight of 1.0 is the top of the hierarchy (statutes);
//! lower weights rank below it when fusing and when scoring hypotheses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Legal/administrative category of a retrieved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    /// Primary legislation.
    Statute,
    /// Government decree implementing a statute.
    Decree,
    /// Administrative circular (e.g. revenue-agency practice notes).
    AdministrativeCircular,
    /// Individual ruling / advance tax ruling.
    Ruling,
    /// Court decision, ranked by tier.
    CaseLaw(CaseLawTier),
    /// Interpretive note or commentary.
    InterpretiveNote,
    /// Practitioner guide, lowest authority.
    PracticeGuide,
}

/// Court tier for case law. Constitutional/supreme courts outrank
/// lower tribunals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseLawTier {
    Constitutional,
    Supreme,
    Appellate,
    Tribunal,
}

impl SourceCategory {
    /// Short human-readable label used in public citations.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Statute => "Statute",
            Self::Decree => "Decree",
            Self::AdministrativeCircular => "Circular",
            Self::Ruling => "Ruling",
            Self::CaseLaw(CaseLawTier::Constitutional) => "Constitutional Court",
            Self::CaseLaw(CaseLawTier::Supreme) => "Supreme Court",
            Self::CaseLaw(CaseLawTier::Appellate) => "Court of Appeal",
            Self::CaseLaw(CaseLawTier::Tribunal) => "Tribunal",
            Self::InterpretiveNote => "Interpretive note",
            Self::PracticeGuide => "Practice guide",
        }
    }
}

/// Authority table: SourceCategory → hierarchy weight in [0, 1].
///
/// Defaults are hardcoded; individual categories (typically case-law
/// sub-tiers) can be overridden. Weights never leave [0, 1].
#[derive(Debug, Clone)]
pub struct AuthorityTable {
    overrides: HashMap<SourceCategory, f64>,
}

impl AuthorityTable {
    /// Create with no overrides (default hierarchy).
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Override the weight for a single category, clamped to [0, 1].
    pub fn with_override(mut self, category: SourceCategory, weight: f64) -> Self {
        self.overrides.insert(category, weight.clamp(0.0, 1.0));
        self
    }

    /// Hierarchy weight for a category, in [0, 1].
    pub fn weight(&self, category: SourceCategory) -> f64 {
        if let Some(w) = self.overrides.get(&category) {
            return *w;
        }
        match category {
            SourceCategory::Statute => 1.0,
            SourceCategory::CaseLaw(CaseLawTier::Constitutional) => 0.95,
            SourceCategory::Decree => 0.9,
            SourceCategory::CaseLaw(CaseLawTier::Supreme) => 0.85,
            SourceCategory::CaseLaw(CaseLawTier::Appellate) => 0.7,
            SourceCategory::Ruling => 0.65,
            SourceCategory::AdministrativeCircular => 0.6,
            SourceCategory::CaseLaw(CaseLawTier::Tribunal) => 0.55,
            SourceCategory::InterpretiveNote => 0.45,
            SourceCategory::PracticeGuide => 0.3,
        }
    }

    /// Post-fusion boost multiplier in [1.0, 1.3]: statutes get the full
    /// boost, practice guides stay near neutral.
    pub fn boost(&self, category: SourceCategory) -> f64 {
        1.0 + 0.3 * self.weight(category)
    }
}

impl Default for AuthorityTable {
    fn default() -> Self {
        Self::new()
    }
}
