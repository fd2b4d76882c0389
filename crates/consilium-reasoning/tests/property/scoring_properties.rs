//! Property tests for hypothesis scoring and selection.

use proptest::prelude::*;

use consilium_core::config::{ReasoningConfig, RiskSurfacingPolicy};
use consilium_core::models::{Hypothesis, Probability, RiskLevel};
use consilium_reasoning::scoring;

fn risk_level() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![
        Just(RiskLevel::Low),
        Just(RiskLevel::Medium),
        Just(RiskLevel::High),
        Just(RiskLevel::Critical),
    ]
}

fn hypothesis() -> impl Strategy<Value = Hypothesis> {
    (0.0f64..=1.0, 0.0f64..=1.0, risk_level()).prop_map(|(p, w, risk)| {
        let mut h = Hypothesis::new("scenario");
        h.probability = Probability::new(p);
        h.source_weight = w;
        h.risk_level = risk;
        h.final_score = scoring::final_score(&ReasoningConfig::default(), &h);
        h
    })
}

fn hypotheses() -> impl Strategy<Value = Vec<Hypothesis>> {
    prop::collection::vec(hypothesis(), 1..6)
}

proptest! {
    /// Scores stay within [0, 1] under the default weights.
    #[test]
    fn final_score_is_bounded(h in hypothesis()) {
        prop_assert!(h.final_score >= 0.0);
        prop_assert!(h.final_score <= 1.0);
    }

    /// With probability and risk held fixed, more authoritative sources
    /// never lower the score.
    #[test]
    fn score_is_monotone_in_source_weight(
        p in 0.0f64..=1.0,
        lo in 0.0f64..=1.0,
        hi in 0.0f64..=1.0,
        risk in risk_level(),
    ) {
        let config = ReasoningConfig::default();
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let mut weak = Hypothesis::new("s");
        weak.probability = Probability::new(p);
        weak.source_weight = lo;
        weak.risk_level = risk;

        let mut strong = weak.clone();
        strong.source_weight = hi;

        prop_assert!(scoring::final_score(&config, &strong) >= scoring::final_score(&config, &weak));
    }

    /// The selected index is always valid and never scored below a peer.
    #[test]
    fn selection_picks_a_maximum(hs in hypotheses()) {
        let selected = scoring::select(&hs);
        prop_assert!(selected < hs.len());
        for h in &hs {
            prop_assert!(hs[selected].final_score >= h.final_score);
        }
    }

    /// Every surfaced alternative satisfies the policy, and the selected
    /// hypothesis never surfaces itself.
    #[test]
    fn surfacing_honors_the_policy(hs in hypotheses()) {
        let policy = RiskSurfacingPolicy::default();
        let selected = scoring::select(&hs);
        let surfaced = scoring::surface_alternatives(&hs, selected, &policy);

        prop_assert!(!surfaced.contains(&hs[selected].id));
        for id in &surfaced {
            let h = hs.iter().find(|h| h.id == *id).unwrap();
            prop_assert!(policy.must_surface(h.risk_level, h.probability.value()));
        }
    }
}
