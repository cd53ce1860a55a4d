//! Retry execution engine
//!
//! Drives repeated attempts of a caller-supplied remote operation,
//! consulting the classifier after each failure, sleeping an
//! exponentially growing delay between attempts, and honoring the
//! caller's cancellation token during every wait.

use std::error::Error;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;
use crate::types::RetryPolicy;

use super::classify::TransientErrorPredicate;
use super::enrich::enrich;
use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver, TracingObserver};
use super::strategies::{backoff_delay, AlwaysRetry, RetryPredicate};

/// Execute a named remote mailbox operation with retry
///
/// Convenience wiring for business operations: the transient-error
/// classifier decides what is retried, attempt lifecycle is logged under
/// `operation`, and the final underlying failure is passed through the
/// enricher before being returned.
///
/// The operation may be invoked up to `policy.max_retries + 1` times, so
/// it must be safe to repeat.
///
/// # Example
///
/// ```rust,no_run
/// use muninn_core::retry::{execute_with_retry, RetryError};
/// use muninn_core::types::RetryPolicy;
/// use muninn_core::ServiceError;
/// use tokio_util::sync::CancellationToken;
///
/// async fn example(cancel: &CancellationToken) -> Result<(), RetryError<ServiceError>> {
///     let policy = RetryPolicy::default();
///
///     execute_with_retry(cancel, &policy, "list-events", || async {
///         // One remote call here
///         Ok(())
///     })
///     .await
/// }
/// ```
pub async fn execute_with_retry<F, Fut, T>(
    cancel: &CancellationToken,
    policy: &RetryPolicy,
    operation: &str,
    op: F,
) -> Result<T, RetryError<ServiceError>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    RetryExecutor::new(policy.clone())
        .with_predicate(TransientErrorPredicate)
        .with_observer(TracingObserver::new(operation))
        .execute(cancel, op)
        .await
        .map_err(|err| err.map_err(|source| enrich(source, operation)))
}

/// A retry executor with configurable policy, predicate, and observer
///
/// Generic over the operation's error type; the predicate decides which
/// failures are worth retrying and the observer receives lifecycle
/// callbacks.
pub struct RetryExecutor<E, P = AlwaysRetry, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
    _phantom: PhantomData<E>,
}

impl<E> RetryExecutor<E, AlwaysRetry, NoOpObserver> {
    /// Create a new executor that retries every failure silently
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            predicate: AlwaysRetry,
            observer: NoOpObserver,
            _phantom: PhantomData,
        }
    }
}

impl<E, P, O> RetryExecutor<E, P, O> {
    /// Set the retry predicate
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutor<E, P2, O> {
        RetryExecutor {
            policy: self.policy,
            predicate,
            observer: self.observer,
            _phantom: PhantomData,
        }
    }

    /// Set the observer
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutor<E, P, O2> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer,
            _phantom: PhantomData,
        }
    }
}

impl<E, P, O> RetryExecutor<E, P, O>
where
    E: Error + Send + 'static,
    P: RetryPredicate<E>,
    O: RetryObserver,
{
    /// Execute an operation with retry logic
    ///
    /// Makes at most `policy.max_retries + 1` calls. The first attempt
    /// starts with zero delay; each inter-attempt wait races the backoff
    /// delay against `cancel`, and cancellation wins the race within the
    /// delay's granularity.
    pub async fn execute<F, Fut, T>(
        &self,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_retries.saturating_add(1);
        let mut last_error: Option<E> = None;

        for attempt_index in 0..max_attempts {
            let attempt = attempt_index + 1;
            self.observer.on_attempt_start(attempt, max_attempts);

            match op().await {
                Ok(result) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(result);
                }
                Err(err) => {
                    if !self.predicate.should_retry(&err) {
                        self.observer.on_non_retryable(attempt, &err);
                        return Err(RetryError::non_retryable(err));
                    }

                    if attempt == max_attempts {
                        self.observer.on_exhausted(max_attempts, &err);
                        return Err(RetryError::exhausted(
                            self.policy.max_retries,
                            err,
                            start.elapsed(),
                        ));
                    }

                    let delay = backoff_delay(&self.policy, attempt_index);
                    self.observer.on_attempt_failed(attempt, &err, delay);
                    last_error = Some(err);

                    tokio::select! {
                        _ = cancel.cancelled() => {
                            self.observer.on_cancelled(attempt);
                            return Err(RetryError::cancelled(attempt, last_error));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        // The final attempt always returns inside the loop; kept as a
        // graceful fallback rather than an unreachable panic.
        Err(RetryError::cancelled(max_attempts, last_error))
    }
}
