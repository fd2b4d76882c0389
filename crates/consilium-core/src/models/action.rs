use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a suggested action plays in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Follows directly from the selected hypothesis.
    Primary,
    /// Covers an unselected but plausible scenario.
    Alternative,
    /// Mitigates a surfaced high-risk scenario ("verify X does not apply").
    Risk,
    /// Invites the user deeper into the topic.
    Deepening,
}

/// A validated follow-up action offered to the user.
///
/// Invariant: every action returned to a caller either carries a
/// `grounded_source` or has `fallback == true`; the validator enforces
/// this before anything is emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedAction {
    pub id: Uuid,
    /// Button label, 8–40 chars.
    pub label: String,
    /// Icon name for the client UI.
    pub icon: String,
    /// The prompt executed when the user picks the action, ≥25 chars.
    pub prompt: String,
    pub action_type: ActionType,
    /// Free-text note on which source/value anchors this action.
    pub source_basis: String,
    /// Paragraph-level pointer into a fused document, when grounded.
    pub grounded_source: Option<String>,
    /// Hypothesis this action derives from, when any.
    pub hypothesis_ref: Option<Uuid>,
    /// True for deterministic safe-fallback actions.
    pub fallback: bool,
}

impl SuggestedAction {
    pub fn new(
        label: impl Into<String>,
        icon: impl Into<String>,
        prompt: impl Into<String>,
        action_type: ActionType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            icon: icon.into(),
            prompt: prompt.into(),
            action_type,
            source_basis: String::new(),
            grounded_source: None,
            hypothesis_ref: None,
            fallback: false,
        }
    }

    pub fn grounded_on(mut self, source_id: impl Into<String>) -> Self {
        self.grounded_source = Some(source_id.into());
        self
    }

    pub fn for_hypothesis(mut self, hypothesis: Uuid) -> Self {
        self.hypothesis_ref = Some(hypothesis);
        self
    }

    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }
}
