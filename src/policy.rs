//! Composed retry + per-attempt timeout policy.
//!
//! [`build`] produces a [`RetryTimeoutPolicy`]: an outer retry loop with
//! linear backoff around an inner timeout applied to every attempt. The
//! executor only sees the [`ResiliencePolicy`] trait, so callers can inject
//! their own implementation (for example [`PassThroughPolicy`] in tests).

use std::{fmt, future::Future, pin::Pin, time::Duration};

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::{ClientError, ClientOptions, Result};

/// Boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A response whose body was read to the end inside the attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BufferedResponse {
    pub status: u16,
    pub body: String,
}

/// One attempt of a request: builds, sends, status-checks it and reads the
/// body.
pub type AttemptFn<'a> =
    dyn Fn() -> BoxFuture<'static, Result<BufferedResponse>> + Send + Sync + 'a;

/// Strategy applied around every request attempt.
pub trait ResiliencePolicy: fmt::Debug + Send + Sync {
    /// Runs `attempt` until it yields a response or a terminal error.
    fn execute<'a>(
        &'a self,
        attempt: &'a AttemptFn<'a>,
        cancel: Option<&'a CancellationToken>,
    ) -> BoxFuture<'a, Result<BufferedResponse>>;
}

/// Builds the composed retry + timeout policy.
///
/// `retry_count = 0` means a single attempt. Retry `k` (1-indexed) waits
/// `k * retry_delay_unit_ms` before starting.
pub fn build(retry_count: u32, retry_delay_unit_ms: u64, timeout_ms: u64) -> RetryTimeoutPolicy {
    RetryTimeoutPolicy {
        retry_count,
        retry_delay_unit_ms,
        timeout_ms,
    }
}

/// Bounded retry with linear backoff around a fixed per-attempt timeout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryTimeoutPolicy {
    retry_count: u32,
    retry_delay_unit_ms: u64,
    timeout_ms: u64,
}

impl RetryTimeoutPolicy {
    pub fn from_options(opts: &ClientOptions) -> Self {
        build(opts.retry_count, opts.retry_delay_unit_ms, opts.timeout_ms)
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay before retry `retry` (1-indexed).
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        Duration::from_millis(self.retry_delay_unit_ms.saturating_mul(u64::from(retry)))
    }

    /// Upper bound on the wall time of one call, ignoring cancellation.
    pub fn worst_case_duration(&self) -> Duration {
        let attempts = u64::from(self.retry_count) + 1;
        let n = u64::from(self.retry_count);
        let backoff_units = n.saturating_mul(n + 1) / 2;
        Duration::from_millis(
            self.timeout_ms
                .saturating_mul(attempts)
                .saturating_add(self.retry_delay_unit_ms.saturating_mul(backoff_units)),
        )
    }

    /// Generic retry loop; [`ResiliencePolicy::execute`] delegates here.
    ///
    /// Attempts are strictly sequential. Cancellation is checked before each
    /// attempt and raced against both the attempt and the backoff delay.
    pub async fn run<T, F, Fut>(&self, attempt: F, cancel: Option<&CancellationToken>) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0u32;
        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(ClientError::Cancelled);
            }

            let err = match self.run_attempt(attempt(), cancel).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_transient() || retry >= self.retry_count {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempts = retry + 1, error = %err, "request failed");
                return Err(err);
            }

            retry += 1;
            let delay = self.delay_before_retry(retry);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                retry,
                delay = ?delay,
                error = %err,
                "retrying request"
            );

            match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => return Err(ClientError::Cancelled),
                        _ = sleep(delay) => {}
                    }
                }
                None => sleep(delay).await,
            }
        }
    }

    async fn run_attempt<T, Fut>(&self, fut: Fut, cancel: Option<&CancellationToken>) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let bounded = timeout(self.timeout(), fut);
        let outcome = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(ClientError::Cancelled),
                    outcome = bounded => outcome,
                }
            }
            None => bounded.await,
        };
        outcome.unwrap_or_else(|_| {
            Err(ClientError::Timeout {
                timeout_ms: self.timeout_ms,
            })
        })
    }
}

impl ResiliencePolicy for RetryTimeoutPolicy {
    fn execute<'a>(
        &'a self,
        attempt: &'a AttemptFn<'a>,
        cancel: Option<&'a CancellationToken>,
    ) -> BoxFuture<'a, Result<BufferedResponse>> {
        Box::pin(self.run(attempt, cancel))
    }
}

/// Runs the attempt exactly once with no timeout.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThroughPolicy;

impl ResiliencePolicy for PassThroughPolicy {
    fn execute<'a>(
        &'a self,
        attempt: &'a AttemptFn<'a>,
        cancel: Option<&'a CancellationToken>,
    ) -> BoxFuture<'a, Result<BufferedResponse>> {
        Box::pin(async move {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(ClientError::Cancelled);
            }
            attempt().await
        })
    }
}
