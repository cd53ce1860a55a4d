//! Retry execution engine for remote mailbox operations
//!
//! Every remote call the CLI makes passes through this module. It
//! provides:
//!
//! - Exponential backoff with a fixed ceiling, cancellable mid-wait
//! - Transient-error classification (structured signals first, message
//!   heuristics as a fallback)
//! - Rate-limit-aware enrichment of the final failure
//! - Observable retry attempts via the [`RetryObserver`] trait
//!
//! # Example
//!
//! ```rust,no_run
//! use muninn_core::retry::{execute_with_retry, RetryError};
//! use muninn_core::types::RetryPolicy;
//! use muninn_core::ServiceError;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn example() -> Result<String, RetryError<ServiceError>> {
//!     let cancel = CancellationToken::new();
//!     let policy = RetryPolicy::default();
//!
//!     execute_with_retry(&cancel, &policy, "list-inbox", || async {
//!         // One remote mailbox call here
//!         Ok("inbox".to_string())
//!     })
//!     .await
//! }
//! ```

mod classify;
mod enrich;
mod error;
mod executor;
mod observer;
mod strategies;

pub use classify::{is_retryable, TransientErrorPredicate, TRANSIENT_PHRASES};
pub use enrich::enrich;
pub use error::RetryError;
pub use executor::{execute_with_retry, RetryExecutor};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use strategies::{backoff_delay, AlwaysRetry, ClosurePredicate, RetryPredicate};
