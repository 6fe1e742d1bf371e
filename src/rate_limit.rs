//! Token-bucket rate limiting for NCBI E-utilities
//!
//! NCBI allows 3 requests per second without an API key and 10 with one;
//! exceeding that gets the caller's IP blocked.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, instrument};

/// Slowest supported rate: one request every 100 seconds
pub const MIN_RATE: f64 = 0.01;

/// Shared token bucket; clones draw from the same bucket
#[derive(Clone, Debug)]
pub struct RateLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Take a token, or report how long until one is available
    fn try_take(&mut self) -> Option<Duration> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            let missing = 1.0 - self.tokens;
            Some(Duration::from_secs_f64(missing / self.refill_rate))
        }
    }
}

impl RateLimiter {
    /// Create a limiter allowing `rate` requests per second
    ///
    /// Non-finite or non-positive rates fall back to 1; positive rates below
    /// [`MIN_RATE`] are raised to it so every wait fits in a `Duration`.
    ///
    /// ```
    /// use pubmed_refset::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(3.0);
    /// assert_eq!(limiter.rate(), 3.0);
    /// ```
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 {
            rate.max(MIN_RATE)
        } else {
            1.0
        };
        let capacity = rate.max(1.0);
        Self {
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
        }
    }

    pub fn ncbi_default() -> Self {
        Self::new(3.0)
    }

    pub fn ncbi_with_key() -> Self {
        Self::new(10.0)
    }

    /// Wait until a token is available and consume it
    #[instrument(skip(self))]
    pub async fn acquire(&self) {
        loop {
            let wait = self.lock().try_take();
            match wait {
                None => {
                    debug!("Rate limit token acquired");
                    return;
                }
                Some(wait) => {
                    debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate limit");
                    sleep(wait).await;
                }
            }
        }
    }

    /// Tokens currently in the bucket
    pub fn token_count(&self) -> f64 {
        let mut bucket = self.lock();
        bucket.refill();
        bucket.tokens
    }

    pub fn rate(&self) -> f64 {
        self.lock().refill_rate
    }

    fn lock(&self) -> MutexGuard<'_, TokenBucket> {
        // Every mutation of the bucket is a single assignment; poisoning is harmless.
        self.bucket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
