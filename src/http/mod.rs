//! HTTP transport
//!
//! reqwest client used by the REST adapter.
//!
//! # Features
//!
//! - **Retries**: backoff retries for idempotent methods only; a POST is sent once
//! - **Rate Limiting**: token bucket rate limiter using governor
//! - **Error Bodies**: 4xx/5xx responses keep the remote body for diagnostics
//! - **Authentication**: credentials applied per request from the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
