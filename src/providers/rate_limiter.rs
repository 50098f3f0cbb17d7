// Request pacing and retry for hosted inference calls.
//
// The hosted inference API throttles free-tier keys and answers 503 while a
// cold model is loading. `RateLimiter` spaces requests out to a configured
// rate; `with_retry` re-runs an operation that failed with one of those
// transient statuses, backing off exponentially. Retries live here in the
// adapter layer; the topic core never retries.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::warn;

/// Minimum-interval limiter shared by every call a client makes.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<Option<Instant>>>,
    interval: Duration,
}

impl RateLimiter {
    /// Allow at most `requests_per_second` requests per second.
    /// A non-positive rate disables limiting.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            inner: Arc::new(Mutex::new(None)),
            interval,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0.0)
    }

    /// Wait until the next request may go out.
    ///
    /// The slot is reserved before sleeping, so concurrent callers queue up
    /// one interval apart instead of all waking at once.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }

        let wait = {
            let mut next_slot = self.inner.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(at) if at > now => at,
                _ => now,
            };
            *next_slot = Some(slot + self.interval);
            slot.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

/// A non-success HTTP response from a provider.
#[derive(Debug, thiserror::Error)]
#[error("HTTP {status}: {body}")]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}

impl HttpStatusError {
    /// 429 (throttled) and 503 (model loading) are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self.status, 429 | 503)
    }
}

fn is_transient(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<HttpStatusError>())
        .any(HttpStatusError::is_transient)
}

/// Backoff schedule for `with_retry`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(20),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base * 2^(attempt-1), capped.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
            .min(self.max_backoff)
    }
}

/// Run `operation`, pacing each attempt through `limiter` and retrying
/// transient HTTP failures per `policy`. Other errors return immediately.
pub async fn with_retry<F, Fut, T>(
    limiter: &RateLimiter,
    policy: &RetryPolicy,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        limiter.acquire().await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_transient(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let backoff = policy.backoff(attempt);
                warn!(
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Transient provider error, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
