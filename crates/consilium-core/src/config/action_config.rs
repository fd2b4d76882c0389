use serde::{Deserialize, Serialize};

use crate::constants;

/// Action generation and validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    pub min_label_chars: usize,
    pub max_label_chars: usize,
    pub min_prompt_chars: usize,
    /// Batch must keep at least this many valid actions or the golden
    /// loop fires.
    pub min_valid_actions: usize,
    /// Golden-loop cap, distinct from transient-failure retries.
    pub max_regeneration_attempts: u32,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            min_label_chars: 8,
            max_label_chars: 40,
            min_prompt_chars: 25,
            min_valid_actions: constants::MIN_VALID_ACTIONS,
            max_regeneration_attempts: constants::MAX_GOLDEN_LOOP_ATTEMPTS,
        }
    }
}
