//! Error types for the retry engine
//!
//! [`RetryError`] keeps the three terminal outcomes of a retry loop
//! distinguishable: the budget ran out, the caller cancelled the wait,
//! or the first failure was permanent and nothing was retried.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Terminal failure of one retry loop invocation
///
/// Generic over `E`, the underlying error type of the retried operation.
#[derive(Debug)]
pub enum RetryError<E> {
    /// All retries were used and the final attempt still failed
    Exhausted {
        /// Number of retries made after the initial attempt
        retries: u32,
        /// The error from the final attempt
        source: E,
        /// Total duration spent across all attempts
        total_duration: Duration,
    },

    /// The cancellation signal fired during an inter-attempt wait
    Cancelled {
        /// Number of attempts completed before cancellation
        attempts: u32,
        /// The error from the last completed attempt, if any
        last_error: Option<E>,
    },

    /// The failure was permanent; no retry was attempted
    NonRetryable(E),
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                retries,
                source,
                total_duration,
            } => {
                write!(
                    f,
                    "operation failed after {} retries over {:.2}s: {}",
                    retries,
                    total_duration.as_secs_f64(),
                    source
                )
            }
            RetryError::Cancelled {
                attempts,
                last_error,
            } => {
                if let Some(err) = last_error {
                    write!(f, "retry cancelled after {} attempts: {}", attempts, err)
                } else {
                    write!(f, "retry cancelled after {} attempts", attempts)
                }
            }
            // Permanent failures are surfaced to the user verbatim.
            RetryError::NonRetryable(source) => write!(f, "{}", source),
        }
    }
}

impl<E: Error + 'static> Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled {
                last_error: Some(err),
                ..
            } => Some(err),
            RetryError::NonRetryable(source) => Some(source),
            _ => None,
        }
    }
}

impl<E> RetryError<E> {
    /// Create a new exhausted error
    pub fn exhausted(retries: u32, source: E, total_duration: Duration) -> Self {
        RetryError::Exhausted {
            retries,
            source,
            total_duration,
        }
    }

    /// Create a new cancelled error
    pub fn cancelled(attempts: u32, last_error: Option<E>) -> Self {
        RetryError::Cancelled {
            attempts,
            last_error,
        }
    }

    /// Create a new non-retryable error
    pub fn non_retryable(source: E) -> Self {
        RetryError::NonRetryable(source)
    }

    /// Total number of operation calls made
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { retries, .. } => retries + 1,
            RetryError::Cancelled { attempts, .. } => *attempts,
            RetryError::NonRetryable(_) => 1,
        }
    }

    /// Check if this error indicates all retries were exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// Check if this error indicates cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }

    /// Check if this error is non-retryable
    pub fn is_non_retryable(&self) -> bool {
        matches!(self, RetryError::NonRetryable(_))
    }

    /// Get the underlying error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled { last_error, .. } => last_error,
            RetryError::NonRetryable(source) => Some(source),
        }
    }

    /// Get a reference to the underlying error
    pub fn source_ref(&self) -> Option<&E> {
        match self {
            RetryError::Exhausted { source, .. } => Some(source),
            RetryError::Cancelled { last_error, .. } => last_error.as_ref(),
            RetryError::NonRetryable(source) => Some(source),
        }
    }

    /// Map the underlying error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            RetryError::Exhausted {
                retries,
                source,
                total_duration,
            } => RetryError::Exhausted {
                retries,
                source: f(source),
                total_duration,
            },
            RetryError::Cancelled {
                attempts,
                last_error,
            } => RetryError::Cancelled {
                attempts,
                last_error: last_error.map(f),
            },
            RetryError::NonRetryable(source) => RetryError::NonRetryable(f(source)),
        }
    }
}
