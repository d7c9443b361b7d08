//! Utility modules for common functionality.
//!
//! - http: HTTP client construction with rate-limit aware retries
//! - logging: Logging utilities
//! - retry: Retry policy with exponential backoff

mod http;
mod retry;

pub mod logging;

pub use http::{create_rpc_http_client, HttpRetryConfig, RateLimitRetryStrategy};
pub use retry::RetryPolicy;
