//! Generation decorator: per-call timeout, transient retries, cost
//! notification, and the internal call ledger.
//!
//! Every stage gets its own `TrackedGenerator` so the ledger knows which
//! stage made which call; all of them share one `CallLedger` per request.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use consilium_core::errors::GenerationError;
use consilium_core::models::{ModelCallRecord, ModelTier};
use consilium_core::traits::{Completion, CompletionConstraints, CostTracker, TextGenerator};

use crate::retry;

// USD per 1k tokens, indicative provider pricing.
const ECONOMY_IN_PER_1K: f64 = 0.00025;
const ECONOMY_OUT_PER_1K: f64 = 0.00125;
const PREMIUM_IN_PER_1K: f64 = 0.003;
const PREMIUM_OUT_PER_1K: f64 = 0.015;

pub fn estimate_cost(tier: ModelTier, tokens_in: u64, tokens_out: u64) -> f64 {
    let (per_in, per_out) = match tier {
        ModelTier::Economy => (ECONOMY_IN_PER_1K, ECONOMY_OUT_PER_1K),
        ModelTier::Premium => (PREMIUM_IN_PER_1K, PREMIUM_OUT_PER_1K),
    };
    (tokens_in as f64 / 1000.0) * per_in + (tokens_out as f64 / 1000.0) * per_out
}

/// Per-request sink for model call records. Shared by the per-stage
/// generator wrappers.
#[derive(Debug, Default)]
pub struct CallLedger {
    records: Mutex<Vec<ModelCallRecord>>,
}

impl CallLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, record: ModelCallRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn records(&self) -> Vec<ModelCallRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Total tokens and estimated cost across all recorded calls.
    pub fn totals(&self) -> (u64, u64, f64) {
        let records = self.records.lock().unwrap();
        let mut tokens_in = 0;
        let mut tokens_out = 0;
        let mut cost = 0.0;
        for r in records.iter() {
            tokens_in += r.tokens_in;
            tokens_out += r.tokens_out;
            cost += estimate_cost(r.tier, r.tokens_in, r.tokens_out);
        }
        (tokens_in, tokens_out, cost)
    }

    pub fn any_premium(&self) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.tier == ModelTier::Premium)
    }
}

pub struct TrackedGenerator {
    inner: Arc<dyn TextGenerator>,
    cost_tracker: Arc<dyn CostTracker>,
    ledger: Arc<CallLedger>,
    stage: &'static str,
    timeout_ms: u64,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl TrackedGenerator {
    pub fn new(
        inner: Arc<dyn TextGenerator>,
        cost_tracker: Arc<dyn CostTracker>,
        ledger: Arc<CallLedger>,
        stage: &'static str,
        timeout_ms: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            inner,
            cost_tracker,
            ledger,
            stage,
            timeout_ms,
            max_retries,
            backoff_base_ms,
        }
    }
}

#[async_trait]
impl TextGenerator for TrackedGenerator {
    async fn complete(
        &self,
        tier: ModelTier,
        prompt: &str,
        constraints: &CompletionConstraints,
    ) -> Result<Completion, GenerationError> {
        let this = self;
        retry::with_retries(self.max_retries, self.backoff_base_ms, move || async move {
            let started = Instant::now();
            let call = this.inner.complete(tier, prompt, constraints);
            let result = match tokio::time::timeout(Duration::from_millis(this.timeout_ms), call)
                .await
            {
                Ok(result) => result,
                Err(_) => Err(GenerationError::Timeout {
                    waited_ms: this.timeout_ms,
                }),
            };
            let latency_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(completion) => {
                    this.cost_tracker
                        .record(tier, completion.tokens_in, completion.tokens_out);
                    this.ledger.push(ModelCallRecord {
                        stage: this.stage.to_string(),
                        tier,
                        tokens_in: completion.tokens_in,
                        tokens_out: completion.tokens_out,
                        latency_ms,
                        succeeded: true,
                    });
                }
                Err(_) => this.ledger.push(ModelCallRecord {
                    stage: this.stage.to_string(),
                    tier,
                    tokens_in: 0,
                    tokens_out: 0,
                    latency_ms,
                    succeeded: false,
                }),
            }
            result
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_testkit::{CountingCostTracker, ScriptedGenerator, ScriptedReply};

    fn tracked(
        generator: ScriptedGenerator,
        tracker: Arc<CountingCostTracker>,
        ledger: Arc<CallLedger>,
    ) -> TrackedGenerator {
        TrackedGenerator::new(
            Arc::new(generator),
            tracker,
            ledger,
            "test",
            1_000,
            2,
            1,
        )
    }

    #[tokio::test]
    async fn successful_call_is_recorded_and_metered() {
        let tracker = Arc::new(CountingCostTracker::default());
        let ledger = Arc::new(CallLedger::new());
        let generator = tracked(
            ScriptedGenerator::single("a reply of reasonable length"),
            tracker.clone(),
            ledger.clone(),
        );

        generator
            .complete(
                ModelTier::Economy,
                "prompt text",
                &CompletionConstraints::default(),
            )
            .await
            .unwrap();

        let records = ledger.records();
        assert_eq!(records.len(), 1);
        assert!(records[0].succeeded);
        assert_eq!(records[0].stage, "test");
        assert_eq!(tracker.total_calls(), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_and_ledgered() {
        let tracker = Arc::new(CountingCostTracker::default());
        let ledger = Arc::new(CallLedger::new());
        let generator = tracked(
            ScriptedGenerator::new(vec![
                ScriptedReply::RateLimited,
                ScriptedReply::Text("recovered".to_string()),
            ]),
            tracker.clone(),
            ledger.clone(),
        );

        let completion = generator
            .complete(
                ModelTier::Premium,
                "prompt",
                &CompletionConstraints::default(),
            )
            .await
            .unwrap();

        assert_eq!(completion.text, "recovered");
        let records = ledger.records();
        assert_eq!(records.len(), 2);
        assert!(!records[0].succeeded);
        assert!(records[1].succeeded);
        assert!(ledger.any_premium());
    }

    #[tokio::test]
    async fn slow_call_times_out_as_transient() {
        let tracker = Arc::new(CountingCostTracker::default());
        let ledger = Arc::new(CallLedger::new());
        let generator = TrackedGenerator::new(
            Arc::new(ScriptedGenerator::single("late").with_delay_ms(200)),
            tracker,
            ledger.clone(),
            "test",
            20,
            0,
            1,
        );

        let err = generator
            .complete(ModelTier::Economy, "p", &CompletionConstraints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Timeout { .. }));
        assert!(!ledger.records()[0].succeeded);
    }

    #[test]
    fn premium_costs_more_than_economy() {
        let economy = estimate_cost(ModelTier::Economy, 1_000, 1_000);
        let premium = estimate_cost(ModelTier::Premium, 1_000, 1_000);
        assert!(premium > economy);
        assert!(economy > 0.0);
    }
}
