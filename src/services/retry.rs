//! Capped retry with linear backoff for transient fetch failures.
//!
//! Applied where the product actually retries (the featured-items strip);
//! other call sites surface their first error directly.

use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);

/// Run `op` up to `max_attempts` times, sleeping `base_delay * attempt`
/// between tries. The last error is returned unchanged.
///
/// # Errors
///
/// Propagates the final attempt's error.
pub async fn with_retry<T, E, F, Fut>(max_attempts: u32, base_delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                tracing::warn!(error = %e, attempt, "transient failure, retrying");
                tokio::time::sleep(base_delay * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;
