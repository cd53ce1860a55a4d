//! Retry configuration types
//!
//! These are plain data carriers: configuration loading and merging
//! (files, environment variables, flags) happens in the CLI layer, which
//! hands a fully resolved [`RetryPolicy`] to the retry engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Ceiling applied to every computed backoff delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Retry policy for remote mailbox operations
///
/// `max_retries` counts additional attempts after the first, so the
/// total number of calls is at most `max_retries + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds, doubled before each further retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// Base delay as a [`Duration`]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}
fn default_base_delay_ms() -> u64 {
    2000
}

/// Retry policies, overridable per operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPoliciesConfig {
    /// Default retry policy
    #[serde(default)]
    pub default: RetryPolicy,

    /// Per-operation retry policies, keyed by operation name
    #[serde(default)]
    pub operations: HashMap<String, RetryPolicy>,
}

impl RetryPoliciesConfig {
    /// Policy for the named operation, falling back to the default
    pub fn for_operation(&self, name: &str) -> &RetryPolicy {
        self.operations.get(name).unwrap_or(&self.default)
    }
}
