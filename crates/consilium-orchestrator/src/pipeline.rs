//! The request pipeline.
//!
//! Stage order per request:
//!   1. pure query analysis (domains, ambiguity, history digest),
//!   2. complexity classification concurrent with expansion + retrieval,
//!   3. reasoning under the remaining deadline,
//!   4. the action golden loop, also deadline-capped,
//!   5. dual-reasoning transform and response assembly.
//!
//! Recovery beats failure: a degraded component adds a note to the
//! response metadata and the pipeline keeps going. `process` errors only
//! when the deadline expires before any answer exists or the generator is
//! completely unusable for the core answer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use consilium_core::authority::AuthorityTable;
use consilium_core::config::OrchestratorConfig;
use consilium_core::errors::{ConsiliumError, ConsiliumResult};
use consilium_core::models::{
    DegradationNote, DualReasoning, InternalTrace, ModelTier, QueryRequest, ResponseMetadata,
    UnifiedResponse,
};
use consilium_core::traits::{ClientContext, CostTracker, NoopCostTracker, Retriever, TextGenerator};

use consilium_actions::{safe_fallback, ActionGenerator, ActionSet, GoldenLoop};
use consilium_query::{detect_ambiguity, domain, history, ComplexityClassifier, QueryExpander};
use consilium_reasoning::{public_reasoning, ReasoningEngine, ReasoningInput};
use consilium_retrieval::HybridRetrieval;

use crate::metrics::PipelineMetrics;
use crate::tracked::{CallLedger, TrackedGenerator};

const HISTORY_DIGEST_MAX_CHARS: usize = 2_000;

pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    retriever: Arc<dyn Retriever>,
    cost_tracker: Arc<dyn CostTracker>,
    client_context: Option<Arc<dyn ClientContext>>,
    authority: Arc<AuthorityTable>,
    config: Arc<OrchestratorConfig>,
    metrics: Arc<PipelineMetrics>,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        retriever: Arc<dyn Retriever>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            generator,
            retriever,
            cost_tracker: Arc::new(NoopCostTracker),
            client_context: None,
            authority: Arc::new(AuthorityTable::new()),
            config: Arc::new(config),
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    pub fn with_cost_tracker(mut self, tracker: Arc<dyn CostTracker>) -> Self {
        self.cost_tracker = tracker;
        self
    }

    pub fn with_client_context(mut self, context: Arc<dyn ClientContext>) -> Self {
        self.client_context = Some(context);
        self
    }

    pub fn with_authority(mut self, authority: AuthorityTable) -> Self {
        self.authority = Arc::new(authority);
        self
    }

    pub fn metrics(&self) -> Arc<PipelineMetrics> {
        Arc::clone(&self.metrics)
    }

    fn stage_generator(
        &self,
        ledger: &Arc<CallLedger>,
        stage: &'static str,
        timeout_ms: u64,
    ) -> Arc<dyn TextGenerator> {
        Arc::new(TrackedGenerator::new(
            Arc::clone(&self.generator),
            Arc::clone(&self.cost_tracker),
            Arc::clone(ledger),
            stage,
            timeout_ms,
            self.config.budgets.max_transient_retries,
            self.config.budgets.backoff_base_ms,
        ))
    }

    pub async fn process(&self, request: QueryRequest) -> ConsiliumResult<UnifiedResponse> {
        let started = Instant::now();
        let deadline = request.deadline_ms.map(Duration::from_millis);
        let remaining = |started: Instant| -> Option<Duration> {
            deadline.map(|d| d.saturating_sub(started.elapsed()))
        };
        let ledger = Arc::new(CallLedger::new());
        let budgets = &self.config.budgets;
        let mut degradations: Vec<DegradationNote> = Vec::new();

        // Pure analysis first: no model calls, nothing to time out.
        let domains = domain::detect(&request.query);
        let ambiguity = detect_ambiguity(
            &request.query,
            request.has_history(),
            self.config.expansion.short_query_tokens,
        );
        let digest = history::digest(&request.history, HISTORY_DIGEST_MAX_CHARS);

        let client_notes = self.resolve_client(&request, &mut degradations).await;

        // Classification runs concurrently with expansion + retrieval and
        // never blocks it; its verdict only gates the reasoning mode.
        let classifier = ComplexityClassifier::new(
            self.stage_generator(&ledger, "classifier", budgets.classifier_timeout_ms),
            budgets.classifier_timeout_ms,
        );
        let expander = QueryExpander::new(
            self.stage_generator(&ledger, "expansion", budgets.expansion_timeout_ms),
            self.config.expansion.clone(),
            budgets.expansion_timeout_ms,
        );
        let hybrid = HybridRetrieval::new(
            Arc::clone(&self.retriever),
            self.config.fusion.clone(),
            Arc::clone(&self.authority),
            budgets.retrieval_timeout_ms,
        );

        let classify_fut = classifier.classify(
            &request.query,
            &domains,
            request.has_history(),
            request.has_attachments,
        );
        let retrieve_fut = async {
            let expanded = expander.expand(&request.query, &digest, &ambiguity).await;
            let output = hybrid.run(&expanded).await;
            (expanded, output)
        };
        let (classification, (expanded, retrieval)) = tokio::join!(classify_fut, retrieve_fut);

        if classification.degraded {
            degradations.push(note(
                "classifier",
                &classification.reasoning,
                "fail-safe simple routing",
            ));
        }
        if expanded.hyde_skipped {
            degradations.push(note(
                "expansion",
                "hypothetical document unavailable or rejected",
                "lexical and semantic variants only",
            ));
        }
        if retrieval.dropped_variants > 0 {
            degradations.push(note(
                "retrieval",
                &format!("{} variant call(s) failed or timed out", retrieval.dropped_variants),
                "fused the remaining lists",
            ));
        }
        if retrieval.is_empty() {
            degradations.push(note(
                "retrieval",
                "no documents found for any variant",
                "answering without citations at lowered confidence",
            ));
        }

        // Reasoning, capped by whatever deadline budget is left. No answer
        // exists yet, so an expiry here is the hard-failure case.
        let engine = ReasoningEngine::new(
            self.stage_generator(&ledger, "reasoning", budgets.generation_timeout_ms),
            Arc::clone(&self.authority),
            self.config.reasoning.clone(),
        );
        let input = ReasoningInput {
            query: request.query.clone(),
            history_digest: (!digest.is_empty()).then(|| digest.clone()),
            client_notes,
            complexity: classification.complexity,
            domains: domains.clone(),
            documents: retrieval.documents.clone(),
        };
        let reasoning_result = match remaining(started) {
            Some(rem) if rem.is_zero() => {
                self.metrics.record_deadline_exceeded();
                return Err(ConsiliumError::DeadlineExceeded);
            }
            Some(rem) => match tokio::time::timeout(rem, engine.reason(&input)).await {
                Ok(result) => result?,
                Err(_) => {
                    self.metrics.record_deadline_exceeded();
                    return Err(ConsiliumError::DeadlineExceeded);
                }
            },
            None => engine.reason(&input).await?,
        };
        if reasoning_result.degraded {
            degradations.push(note(
                "reasoning",
                "model output unusable on some path",
                "mode downgrade or excerpt-based answer",
            ));
        }

        // An answer now exists; from here the deadline can only trim the
        // action rail, never fail the request.
        let golden_loop = GoldenLoop::new(
            ActionGenerator::new(self.stage_generator(
                &ledger,
                "actions",
                budgets.regeneration_timeout_ms,
            )),
            self.config.actions.clone(),
        );
        let action_set = match remaining(started) {
            Some(rem) if rem.is_zero() => {
                warn!("deadline reached before action generation, using safe fallback");
                fallback_actions(&reasoning_result, &retrieval)
            }
            Some(rem) => match tokio::time::timeout(
                rem,
                golden_loop.run(&request.query, &reasoning_result, &retrieval.documents),
            )
            .await
            {
                Ok(set) => set,
                Err(_) => {
                    warn!("deadline reached during action generation, using safe fallback");
                    fallback_actions(&reasoning_result, &retrieval)
                }
            },
            None => {
                golden_loop
                    .run(&request.query, &reasoning_result, &retrieval.documents)
                    .await
            }
        };
        if action_set.fell_back {
            degradations.push(note(
                "actions",
                "no valid generated batch within the attempt cap",
                "deterministic safe-fallback actions",
            ));
        }

        // Transform and assemble. All deterministic from here on.
        let public = public_reasoning(&reasoning_result, &retrieval.documents, &retrieval.conflicts);
        let (tokens_in, tokens_out, cost) = ledger.totals();
        let latency_ms = started.elapsed().as_millis() as u64;
        let internal = InternalTrace {
            mode: reasoning_result.mode,
            hypotheses: reasoning_result.hypotheses.clone(),
            selection_reasoning: reasoning_result.selection_reasoning.clone(),
            cross_domain_notes: reasoning_result.cross_domain_notes.clone(),
            model_calls: ledger.records(),
            tokens_in,
            tokens_out,
            cost,
            latency_ms,
        };

        let metadata = ResponseMetadata {
            model_used: if ledger.any_premium() {
                ModelTier::Premium
            } else {
                ModelTier::Economy
            },
            complexity: classification.complexity,
            cost,
            latency_ms,
            regeneration_attempts: action_set.attempts.saturating_sub(1),
            degraded: !degradations.is_empty(),
            degradations,
        };
        self.metrics
            .observe(&metadata, tokens_in, tokens_out, action_set.fell_back);

        info!(
            complexity = ?metadata.complexity,
            mode = ?internal.mode,
            documents = retrieval.documents.len(),
            conflicts = retrieval.conflicts.len(),
            actions = action_set.actions.len(),
            degraded = metadata.degraded,
            latency_ms,
            "pipeline complete"
        );

        Ok(UnifiedResponse {
            answer: reasoning_result.answer.clone(),
            sources_cited: public.sources.clone(),
            suggested_actions: action_set.actions,
            reasoning: DualReasoning {
                internal,
                public,
            },
            metadata,
        })
    }

    /// Best-effort client profile lookup; failures degrade, never abort.
    async fn resolve_client(
        &self,
        request: &QueryRequest,
        degradations: &mut Vec<DegradationNote>,
    ) -> Option<String> {
        let (context, id) = match (&self.client_context, &request.client_id) {
            (Some(context), Some(id)) => (context, id),
            _ => return None,
        };
        match context.get(id).await {
            Ok(Some(profile)) if !profile.notes.is_empty() => Some(profile.notes.join("; ")),
            Ok(_) => None,
            Err(err) => {
                warn!(client_id = %id, error = %err, "client context lookup failed");
                degradations.push(note(
                    "client_context",
                    "profile lookup failed",
                    "answering without personalization",
                ));
                None
            }
        }
    }
}

fn note(component: &str, failure: &str, fallback_used: &str) -> DegradationNote {
    DegradationNote {
        component: component.to_string(),
        failure: failure.to_string(),
        fallback_used: fallback_used.to_string(),
    }
}

fn fallback_actions(
    reasoning: &consilium_core::models::ReasoningResult,
    retrieval: &consilium_retrieval::RetrievalOutput,
) -> ActionSet {
    ActionSet {
        actions: safe_fallback(reasoning, &retrieval.documents),
        attempts: 0,
        fell_back: true,
        quality_score: 0.0,
    }
}
