use serde::{Deserialize, Serialize};

/// Query expander configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Paraphrase variants requested from the model (2–3).
    pub max_paraphrases: usize,
    /// Query shorter than this many tokens counts as an ambiguity signal.
    pub short_query_tokens: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_paraphrases: 3,
            short_query_tokens: 5,
        }
    }
}
