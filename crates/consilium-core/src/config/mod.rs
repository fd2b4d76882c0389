//! Immutable orchestrator configuration.
//!
//! Loaded once at process start, then passed by reference (`Arc`) to every
//! stage. Defaults are hardcoded; any field can be overridden via TOML.

mod action_config;
mod budget_config;
mod expansion_config;
mod fusion_config;
mod reasoning_config;

pub use action_config::ActionConfig;
pub use budget_config::BudgetConfig;
pub use expansion_config::ExpansionConfig;
pub use fusion_config::FusionConfig;
pub use reasoning_config::{ReasoningConfig, RiskSurfacingPolicy};

use serde::{Deserialize, Serialize};

use crate::errors::{ConsiliumError, ConsiliumResult};

/// Top-level configuration for the whole pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub expansion: ExpansionConfig,
    pub fusion: FusionConfig,
    pub reasoning: ReasoningConfig,
    pub actions: ActionConfig,
    pub budgets: BudgetConfig,
}

impl OrchestratorConfig {
    /// Parse a TOML override file. Missing fields keep their defaults.
    pub fn from_toml_str(s: &str) -> ConsiliumResult<Self> {
        toml::from_str(s).map_err(|e| ConsiliumError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_hold() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.fusion.rrf_k, 60.0);
        assert_eq!(config.fusion.top_n, 10);
        assert_eq!(config.actions.max_regeneration_attempts, 2);
        // Transient retries are on top of the initial call; three calls
        // total at most.
        assert_eq!(config.budgets.max_transient_retries, 2);
        assert_eq!(config.reasoning.surfacing.min_probability, 0.1);
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let config = OrchestratorConfig::from_toml_str(
            r#"
            [fusion]
            top_n = 5

            [reasoning.surfacing]
            min_probability = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.fusion.top_n, 5);
        assert_eq!(config.fusion.rrf_k, 60.0);
        assert_eq!(config.reasoning.surfacing.min_probability, 0.2);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(OrchestratorConfig::from_toml_str("fusion = 3").is_err());
    }
}
