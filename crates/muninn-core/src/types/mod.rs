//! Type definitions for muninn configuration

mod retry_config;

pub use retry_config::{RetryPoliciesConfig, RetryPolicy, MAX_BACKOFF};
