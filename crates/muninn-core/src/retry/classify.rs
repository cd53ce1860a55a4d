//! Transient-error classification
//!
//! Decides whether a failed remote call is worth retrying. Structured
//! signals are checked first: the error variant, then the response
//! status code. Only when neither settles the question is the error's
//! diagnostic text scanned for known transient-failure phrases, a
//! best-effort heuristic that couples to the SDK's error wording and is
//! kept strictly as a fallback.

use crate::error::ServiceError;

use super::strategies::RetryPredicate;

/// Status codes the service uses to signal a transient condition
const RETRYABLE_STATUS: [u16; 3] = [429, 503, 504];

/// Transient-failure phrases scanned for in diagnostic text, lowercase
pub const TRANSIENT_PHRASES: [&str; 8] = [
    "timeout",
    "connection reset",
    "connection refused",
    "temporary failure",
    "try again",
    "i/o timeout",
    "no such host",
    "network is unreachable",
];

/// Whether a failed remote call should be retried
///
/// Total and side-effect free. Cancellation and deadline expiry are
/// never retryable: they are an explicit caller decision to stop.
/// Everything that matches neither the retryable statuses nor the
/// transient phrases is treated as permanent.
pub fn is_retryable(error: &ServiceError) -> bool {
    match error {
        ServiceError::Cancelled | ServiceError::DeadlineExceeded => false,
        ServiceError::Response { status, .. } if RETRYABLE_STATUS.contains(status) => true,
        _ => {
            let message = error.to_string().to_lowercase();
            TRANSIENT_PHRASES
                .iter()
                .any(|phrase| message.contains(phrase))
        }
    }
}

/// The classifier in predicate form, for plugging into the retry engine
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientErrorPredicate;

impl RetryPredicate<ServiceError> for TransientErrorPredicate {
    fn should_retry(&self, error: &ServiceError) -> bool {
        is_retryable(error)
    }
}
