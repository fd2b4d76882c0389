/// Consilium system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reciprocal Rank Fusion smoothing constant.
pub const RRF_K: f64 = 60.0;

/// Maximum fused documents passed to the reasoning engine.
pub const DEFAULT_TOP_N: usize = 10;

/// Golden-loop correction attempts (generate → validate → regenerate).
pub const MAX_GOLDEN_LOOP_ATTEMPTS: u32 = 2;

/// Transient-failure retries after the initial model call (backoff, not
/// correction). Three calls total at most.
pub const MAX_TRANSIENT_RETRIES: u32 = 2;

/// Latency budget for the complexity classifier call, in milliseconds.
pub const CLASSIFIER_BUDGET_MS: u64 = 500;

/// Minimum validated actions a response must carry.
pub const MIN_VALID_ACTIONS: usize = 2;

/// Maximum hypotheses the tree-mode reasoning engine may produce.
pub const MAX_HYPOTHESES: usize = 4;

/// Maximum suggested actions kept from a generated batch.
pub const MAX_SUGGESTED_ACTIONS: usize = 4;
