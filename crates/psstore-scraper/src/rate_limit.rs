//! Retry with exponential backoff for storefront page requests.
//!
//! Only transient conditions are retried: HTTP 429 and transport failures.
//! Everything else, including extraction errors, is returned on first sight.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on any single wait, whatever `Retry-After` asks for.
const MAX_RETRY_WAIT_SECS: u64 = 300;

/// How long to wait before retry `attempt + 1`, or `None` when `err` is not
/// worth retrying.
///
/// The backoff step is `backoff_base_secs * 2^attempt`. A 429 that carried
/// `Retry-After` waits for the larger of that and the server's value.
fn retry_delay(err: &ScraperError, attempt: u32, backoff_base_secs: u64) -> Option<Duration> {
    let backoff_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    let delay_secs = match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.map_or(backoff_secs, |after| after.max(backoff_secs)),
        ScraperError::Http(_) => backoff_secs,
        _ => return None,
    };
    Some(Duration::from_secs(delay_secs.min(MAX_RETRY_WAIT_SECS)))
}

/// Runs `operation`, retrying transient errors up to `max_retries` more
/// times with the wait from [`retry_delay`]; the last error is returned once
/// retries are spent.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        let delay = match retry_delay(&err, attempt, backoff_base_secs) {
            Some(delay) if attempt < max_retries => delay,
            _ => return Err(err),
        };

        tracing::warn!(
            attempt,
            max_retries,
            delay_secs = delay.as_secs(),
            error = %err,
            "transient page fetch error, backing off"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
