//! Error types for muninn-core
//!
//! `ServiceError` is the shared model for everything that can go wrong
//! during one remote mailbox call. The vendor SDK's failures are mapped
//! into it at the transport boundary; the retry engine, classifier, and
//! enricher all operate on this type rather than on SDK-specific errors.

use thiserror::Error;

/// Result type alias using muninn-core's ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;

/// A failure from one remote mailbox operation
///
/// The first four variants are produced at the call boundary. The last
/// two are produced only by [`crate::retry::enrich`], which wraps the
/// original failure so that `source()` chains still reach it.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The caller's cancellation signal fired
    #[error("operation cancelled")]
    Cancelled,

    /// A caller-imposed deadline expired
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A structured, well-formed failure response from the service
    #[error("service request failed with status {status}: {message}")]
    Response {
        /// HTTP-style status code
        status: u16,
        /// Service error-code spelling, when the response carried one
        code: Option<String>,
        /// Human-readable message from the response body
        message: String,
        /// Response metadata headers, in received order
        headers: Vec<(String, String)>,
    },

    /// A transport-level failure with only diagnostic text
    #[error("{0}")]
    Transport(String),

    /// Rate limiting, detected and explained by the enricher
    #[error("{}", rate_limited_message(.operation, .retry_after_secs))]
    RateLimited {
        /// Operation that was throttled
        operation: String,
        /// Retry-after hint from response metadata, in seconds
        retry_after_secs: Option<u64>,
        /// The original failure
        #[source]
        source: Box<ServiceError>,
    },

    /// Transient service unavailability, detected by the enricher
    #[error("service temporarily unavailable during {operation} (code: {code})")]
    Unavailable {
        /// Operation that hit the outage
        operation: String,
        /// Service error-code spelling that signalled the outage
        code: String,
        /// The original failure
        #[source]
        source: Box<ServiceError>,
    },
}

impl ServiceError {
    /// Create a transport-level error from diagnostic text
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a structured response error without a service code
    pub fn response(status: u16, message: impl Into<String>) -> Self {
        Self::Response {
            status,
            code: None,
            message: message.into(),
            headers: Vec::new(),
        }
    }

    /// Create a structured response error carrying a service error code
    pub fn response_with_code(
        status: u16,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Response {
            status,
            code: Some(code.into()),
            message: message.into(),
            headers: Vec::new(),
        }
    }

    /// Attach a response metadata header
    ///
    /// Has no effect on variants other than [`ServiceError::Response`].
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Response { headers, .. } = &mut self {
            headers.push((name.into(), value.into()));
        }
        self
    }

    /// Status code of a structured response failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Service error-code spelling of a structured response failure
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Self::Response { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// First header value with the given name, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            Self::Response { headers, .. } => headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

fn rate_limited_message(operation: &str, retry_after_secs: &Option<u64>) -> String {
    let hint = match retry_after_secs {
        Some(secs) => format!(" (retry after {secs}s)"),
        None => String::new(),
    };
    format!(
        "rate limit exceeded during {operation}{hint}; suggestions: \
         (1) reduce request frequency, (2) use exponential backoff, \
         (3) review application throttling limits"
    )
}
