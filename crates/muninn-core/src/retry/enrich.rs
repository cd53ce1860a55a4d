//! Rate-limit-aware error enrichment
//!
//! Turns recognized service error codes into actionable failures before
//! they reach the user. Enrichment never fabricates information: errors
//! without a recognizable structured payload pass through unchanged, and
//! every extraction step degrades to the original error on failure.

use tracing::{debug, warn};

use crate::error::ServiceError;

/// Service error-code spellings that indicate rate limiting
const RATE_LIMIT_CODES: [&str; 2] = ["TooManyRequests", "ActivityLimitReached"];

/// Service error-code spellings that indicate transient unavailability
const UNAVAILABLE_CODES: [&str; 2] = ["ServiceNotAvailable", "ServiceUnavailable"];

/// Header carrying the service's retry-after hint, in whole seconds
const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Enrich a failure from the named operation
///
/// Rate-limit codes become [`ServiceError::RateLimited`] with remediation
/// guidance and, when the response metadata carries one, a retry-after
/// hint (first header value only). Unavailability codes become
/// [`ServiceError::Unavailable`]. Both wrap the original error so
/// `source()` chains still reach it. Any other error is returned
/// unchanged.
pub fn enrich(error: ServiceError, operation: &str) -> ServiceError {
    let Some(code) = error.service_code().map(str::to_owned) else {
        return error;
    };

    if RATE_LIMIT_CODES.iter().any(|c| c.eq_ignore_ascii_case(&code)) {
        warn!(
            operation = %operation,
            code = %code,
            "request was rate limited by the service"
        );
        let retry_after_secs = error
            .header(RETRY_AFTER_HEADER)
            .and_then(|value| value.trim().parse::<u64>().ok());
        return ServiceError::RateLimited {
            operation: operation.to_string(),
            retry_after_secs,
            source: Box::new(error),
        };
    }

    if UNAVAILABLE_CODES.iter().any(|c| c.eq_ignore_ascii_case(&code)) {
        warn!(
            operation = %operation,
            code = %code,
            "service reported itself temporarily unavailable"
        );
        return ServiceError::Unavailable {
            operation: operation.to_string(),
            code,
            source: Box::new(error),
        };
    }

    debug!(
        operation = %operation,
        code = %code,
        "service error code carries no enrichment"
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_rate_limit_with_retry_after_header() {
        let original = ServiceError::response_with_code(429, "TooManyRequests", "busy")
            .with_header("Retry-After", "30");
        let original_text = original.to_string();

        let enriched = enrich(original, "list-events");

        let message = enriched.to_string();
        assert!(message.contains("rate limit exceeded during list-events"));
        assert!(message.contains("30"));
        assert_eq!(
            enriched.source().map(ToString::to_string),
            Some(original_text)
        );
    }

    #[test]
    fn test_first_retry_after_value_wins() {
        let original = ServiceError::response_with_code(429, "TooManyRequests", "busy")
            .with_header("Retry-After", "10")
            .with_header("Retry-After", "999");

        match enrich(original, "send-mail") {
            ServiceError::RateLimited {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, Some(10)),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_activity_limit_code_without_header() {
        let original = ServiceError::response_with_code(429, "ActivityLimitReached", "busy");

        match enrich(original, "create-invite") {
            ServiceError::RateLimited {
                operation,
                retry_after_secs,
                ..
            } => {
                assert_eq!(operation, "create-invite");
                assert_eq!(retry_after_secs, None);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_unparsable_retry_after_degrades_to_no_hint() {
        let original = ServiceError::response_with_code(429, "TooManyRequests", "busy")
            .with_header("Retry-After", "Wed, 21 Oct 2026 07:28:00 GMT");

        match enrich(original, "list-inbox") {
            ServiceError::RateLimited {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, None),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_unavailability_codes_wrap_with_explanation() {
        for code in UNAVAILABLE_CODES {
            let original = ServiceError::response_with_code(503, code, "down for maintenance");
            let enriched = enrich(original, "free-busy");

            let message = enriched.to_string();
            assert!(
                message.contains("service temporarily unavailable during free-busy"),
                "code {code}: unexpected message {message:?}"
            );
            assert!(message.contains(code));
            assert!(enriched.source().is_some());
        }
    }

    #[test]
    fn test_unrecognized_code_passes_through() {
        let original = ServiceError::response_with_code(403, "AccessDenied", "forbidden");
        let original_text = original.to_string();

        let result = enrich(original, "send-mail");
        assert_eq!(result.to_string(), original_text);
        assert!(result.source().is_none());
    }

    #[test]
    fn test_unstructured_errors_pass_through() {
        let result = enrich(ServiceError::transport("connection refused"), "list-events");
        assert!(matches!(result, ServiceError::Transport(_)));

        let result = enrich(ServiceError::response(429, "no code present"), "list-events");
        assert!(matches!(result, ServiceError::Response { .. }));
    }
}
