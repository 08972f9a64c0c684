//! HTTP client module
//!
//! Provides the HTTP client used to fetch portfolio pages.
//!
//! # Features
//!
//! - **Rate Limiting**: Token bucket throttle using governor, one request per
//!   second by default
//! - **Default Headers**: Browser-like header set the upstream requires
//! - **Optional Retries**: Bounded retries with constant, linear or exponential
//!   backoff (off by default)

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, BROWSER_USER_AGENT};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
