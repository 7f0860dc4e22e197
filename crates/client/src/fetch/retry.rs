//! Bounded retry with exponential backoff for transient fetch failures.

use std::future::Future;
use std::time::Duration;

use lboxd_core::Error;
use url::Url;

/// How many times, and how patiently, a failed request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (default: 3).
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each later one (default: 500ms).
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, backoff: Duration::from_millis(500) }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Run `op` until it succeeds, fails permanently, or exhausts the policy.
///
/// Only errors for which [`Error::is_transient`] holds are retried.
pub async fn with_retry<T, Fut>(policy: &RetryPolicy, url: &Url, mut op: impl FnMut() -> Fut) -> Result<T, Error>
where
    Fut: Future<Output = Result<T, Error>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay(attempt);
                tracing::warn!(
                    url = %url,
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    error = %err,
                    "transient fetch failure, backing off {:.1}s",
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://letterboxd.com/someone/films/").unwrap()
    }

    fn unavailable() -> Error {
        Error::HttpStatus { url: url().to_string(), status: 503 }
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy { max_retries: 3, backoff: Duration::from_millis(100) };
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_then_succeeds() {
        let policy = RetryPolicy { max_retries: 3, backoff: Duration::from_millis(10) };
        let mut calls = 0u32;

        let result = with_retry(&policy, &url(), || {
            calls += 1;
            let n = calls;
            async move { if n < 3 { Err(unavailable()) } else { Ok("page") } }
        })
        .await;

        assert_eq!(result.unwrap(), "page");
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let policy = RetryPolicy { max_retries: 2, backoff: Duration::from_millis(10) };
        let mut calls = 0u32;

        let result: Result<(), Error> = with_retry(&policy, &url(), || {
            calls += 1;
            async { Err(unavailable()) }
        })
        .await;

        assert!(matches!(result, Err(Error::HttpStatus { status: 503, .. })));
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_not_retried() {
        let policy = RetryPolicy::default();
        let mut calls = 0u32;

        let result: Result<(), Error> = with_retry(&policy, &url(), || {
            calls += 1;
            async { Err(Error::HttpStatus { url: String::new(), status: 404 }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
