//! Transient-failure retry with exponential backoff.
//!
//! Retries only errors the provider may recover from (timeouts, rate
//! limits, provider errors). Malformed output is a contract problem, not
//! a transient one; it belongs to the stricter-retry paths upstream.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use consilium_core::errors::GenerationError;

/// `max_retries` counts retries after the initial call, so the total
/// number of attempts is `max_retries + 1`.
pub async fn with_retries<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut op: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_retries => {
                let delay_ms = backoff_base_ms.saturating_mul(1 << attempt);
                warn!(error = %err, attempt = attempt + 1, delay_ms, "transient generation failure, retrying");
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
