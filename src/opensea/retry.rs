use super::errors::FetchError;
use backoff::backoff::Backoff;
use backoff::future::{Retry, Sleeper};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// How many times an upstream request is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn backoff(&self) -> FixedBackoff {
        let retries = self.max_attempts.saturating_sub(1);
        FixedBackoff {
            delay: self.delay,
            retries,
            remaining: retries,
        }
    }
}

/// Constant delay, handing out a bounded number of retries.
#[derive(Debug, Clone)]
pub struct FixedBackoff {
    delay: Duration,
    retries: u32,
    remaining: u32,
}

impl Backoff for FixedBackoff {
    fn reset(&mut self) {
        self.remaining = self.retries;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.delay)
    }
}

/// Waits between attempts. Swapped out in tests so retries don't take wall-clock time.
pub type SharedSleeper = Arc<dyn Sleeper<Sleep = BoxFuture<'static, ()>> + Send + Sync>;

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleep;

impl Sleeper for TokioSleep {
    type Sleep = BoxFuture<'static, ()>;

    fn sleep(&self, dur: Duration) -> Self::Sleep {
        tokio::time::sleep(dur).boxed()
    }
}

#[derive(Clone)]
struct Shared(SharedSleeper);

impl Sleeper for Shared {
    type Sleep = BoxFuture<'static, ()>;

    fn sleep(&self, dur: Duration) -> Self::Sleep {
        self.0.sleep(dur)
    }
}

#[derive(Clone)]
pub struct Retrier {
    policy: RetryPolicy,
    sleeper: SharedSleeper,
}

impl Retrier {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, Arc::new(TokioSleep))
    }

    pub fn with_sleeper(policy: RetryPolicy, sleeper: SharedSleeper) -> Self {
        Self { policy, sleeper }
    }

    /// Runs `op` until it succeeds, fails permanently, or the policy runs out of attempts.
    ///
    /// An upstream `retry_after` hint takes precedence over the policy delay.
    pub async fn run<T, F, Fut>(&self, what: &str, op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, backoff::Error<FetchError>>>,
    {
        let max_attempts = self.policy.max_attempts;
        let mut retries = 0u32;
        let notify = |err: FetchError, delay: Duration| {
            retries += 1;
            log::warn!(
                "{} failed (attempt {}/{}): {}, retrying in {:?}",
                what,
                retries,
                max_attempts,
                err,
                delay
            );
        };

        let sleeper = Shared(self.sleeper.clone());
        let result = Retry::new(sleeper, self.policy.backoff(), notify, op).await;
        result.map_err(|e| e.with_attempts(retries + 1))
    }
}
