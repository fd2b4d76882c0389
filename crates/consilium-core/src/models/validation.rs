use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why the validator rejected an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    LabelTooShort,
    LabelTooLong,
    PromptTooShort,
    /// Label matches the generic deny-list ("learn more" and friends).
    GenericLabel,
    /// Prompt directs the user to an external professional/portal
    /// instead of acting.
    ForbiddenReferral,
    /// No grounded source and not tagged as fallback.
    Ungrounded,
}

impl RejectionReason {
    /// Short description fed back into the correction prompt.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::LabelTooShort => "label shorter than the minimum length",
            Self::LabelTooLong => "label longer than the maximum length",
            Self::PromptTooShort => "prompt too short to be actionable",
            Self::GenericLabel => "label is generic and uninformative",
            Self::ForbiddenReferral => "action refers the user elsewhere instead of acting",
            Self::Ungrounded => "action cites no retrieved source",
        }
    }
}

/// Per-action validation verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action_id: Uuid,
    pub accepted: bool,
    pub rejection_reason: Option<RejectionReason>,
}

/// Batch-level validation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub outcomes: Vec<ActionOutcome>,
    /// Accepted fraction in [0, 1].
    pub quality_score: f64,
}

impl BatchOutcome {
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.accepted).count()
    }

    pub fn rejection_reasons(&self) -> Vec<RejectionReason> {
        self.outcomes
            .iter()
            .filter_map(|o| o.rejection_reason)
            .collect()
    }
}
