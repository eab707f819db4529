//! Bounded exponential backoff for transient adapter failures.

use std::future::Future;

use tracing::warn;

use crate::config::RetryConfig;
use crate::model::ProviderName;
use crate::provider::ProviderResult;

/// Run `op` until it succeeds, fails permanently, or the attempt cap is hit.
///
/// Only failures classified transient are retried; the delay doubles after
/// each one. A permanent failure is returned immediately. Each retry
/// re-issues the identical request.
pub(crate) async fn with_retry<T, F, Fut>(
    policy: RetryConfig,
    provider: &ProviderName,
    operation: &str,
    mut op: F,
) -> ProviderResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.base_delay();
    let mut attempt = 1u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                warn!(
                    provider = %provider,
                    operation,
                    attempt,
                    wait_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient provider failure, backing off"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
