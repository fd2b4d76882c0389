//! Deterministic validation of generated action batches.
//!
//! Checks run in a fixed order and the first failure wins, so the
//! rejection reason fed back into the correction prompt is stable across
//! runs. No model call happens here.

use consilium_core::config::ActionConfig;
use consilium_core::models::{ActionOutcome, BatchOutcome, RejectionReason, SuggestedAction};

use crate::rules;

pub struct ActionValidator {
    config: ActionConfig,
}

impl ActionValidator {
    pub fn new(config: ActionConfig) -> Self {
        Self { config }
    }

    /// First failed check, or `None` when the action is acceptable.
    pub fn validate_action(&self, action: &SuggestedAction) -> Option<RejectionReason> {
        let label_chars = action.label.trim().chars().count();
        if label_chars < self.config.min_label_chars {
            return Some(RejectionReason::LabelTooShort);
        }
        if label_chars > self.config.max_label_chars {
            return Some(RejectionReason::LabelTooLong);
        }
        if action.prompt.trim().chars().count() < self.config.min_prompt_chars {
            return Some(RejectionReason::PromptTooShort);
        }
        if rules::is_generic_label(&action.label) {
            return Some(RejectionReason::GenericLabel);
        }
        if rules::is_forbidden_referral(&action.prompt) {
            return Some(RejectionReason::ForbiddenReferral);
        }
        if action.grounded_source.is_none() && !action.fallback {
            return Some(RejectionReason::Ungrounded);
        }
        None
    }

    pub fn validate_batch(&self, actions: &[SuggestedAction]) -> BatchOutcome {
        let outcomes: Vec<ActionOutcome> = actions
            .iter()
            .map(|action| {
                let rejection_reason = self.validate_action(action);
                ActionOutcome {
                    action_id: action.id,
                    accepted: rejection_reason.is_none(),
                    rejection_reason,
                }
            })
            .collect();

        let quality_score = if outcomes.is_empty() {
            0.0
        } else {
            outcomes.iter().filter(|o| o.accepted).count() as f64 / outcomes.len() as f64
        };

        BatchOutcome {
            outcomes,
            quality_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_core::models::ActionType;

    fn validator() -> ActionValidator {
        ActionValidator::new(ActionConfig::default())
    }

    fn good_action() -> SuggestedAction {
        SuggestedAction::new(
            "Verifica il regime OSS",
            "check-circle",
            "Verifica se il regime OSS si applica alle mie vendite verso la Germania.",
            ActionType::Primary,
        )
        .grounded_on("statute-1")
    }

    #[test]
    fn well_formed_grounded_action_passes() {
        assert_eq!(validator().validate_action(&good_action()), None);
    }

    #[test]
    fn short_label_is_rejected_first() {
        let mut action = good_action();
        action.label = "Vedi".to_string();
        // The prompt also fails the referral rule, but label length wins.
        action.prompt = "Consulta il tuo commercialista per maggiori dettagli su questo.".to_string();
        assert_eq!(
            validator().validate_action(&action),
            Some(RejectionReason::LabelTooShort)
        );
    }

    #[test]
    fn overlong_label_is_rejected() {
        let mut action = good_action();
        action.label = "Verifica in modo approfondito tutti i presupposti del regime".to_string();
        assert_eq!(
            validator().validate_action(&action),
            Some(RejectionReason::LabelTooLong)
        );
    }

    #[test]
    fn short_prompt_is_rejected() {
        let mut action = good_action();
        action.prompt = "Verifica il regime.".to_string();
        assert_eq!(
            validator().validate_action(&action),
            Some(RejectionReason::PromptTooShort)
        );
    }

    #[test]
    fn generic_label_is_rejected() {
        let mut action = good_action();
        action.label = "Maggiori informazioni".to_string();
        assert_eq!(
            validator().validate_action(&action),
            Some(RejectionReason::GenericLabel)
        );
    }

    #[test]
    fn referral_prompt_is_rejected() {
        let mut action = good_action();
        action.prompt =
            "Per il tuo caso specifico consulta un commercialista esperto di IVA UE.".to_string();
        assert_eq!(
            validator().validate_action(&action),
            Some(RejectionReason::ForbiddenReferral)
        );
    }

    #[test]
    fn ungrounded_non_fallback_is_rejected() {
        let mut action = good_action();
        action.grounded_source = None;
        assert_eq!(
            validator().validate_action(&action),
            Some(RejectionReason::Ungrounded)
        );
    }

    #[test]
    fn fallback_actions_may_be_ungrounded() {
        let mut action = good_action().as_fallback();
        action.grounded_source = None;
        assert_eq!(validator().validate_action(&action), None);
    }

    #[test]
    fn batch_quality_is_the_accepted_fraction() {
        let mut bad = good_action();
        bad.grounded_source = None;
        let outcome = validator().validate_batch(&[good_action(), bad]);
        assert_eq!(outcome.accepted_count(), 1);
        assert!((outcome.quality_score - 0.5).abs() < 1e-9);
    }
}
