//! Shopify Admin REST API client for order counts.
//!
//! # Architecture
//!
//! - Plain `reqwest` GET against `orders/count.json`, no GraphQL
//! - Shopify is source of truth - counts are never stored
//! - In-memory caching via `moka` keyed by period and time bucket
//! - Bounded request timeout; throttled or unavailable responses retried
//!   with exponential backoff
//!
//! # Example
//!
//! ```rust,ignore
//! use order_counter_server::shopify::OrderCounter;
//!
//! let counter = OrderCounter::new(&config.shopify)?;
//! let range = Period::ThisWeek.resolve(Utc::now(), &Utc)?;
//! let result = counter.count_orders(Period::ThisWeek, &range).await;
//! ```

mod orders;
pub mod types;

pub use orders::OrderCounter;

use std::time::Duration;

use order_counter_core::CountError;
use reqwest::StatusCode;
use thiserror::Error;

/// First retry delay; doubles on every further attempt.
const BASE_BACKOFF: Duration = Duration::from_millis(250);

/// Cap on a server-provided `Retry-After`.
const MAX_RETRY_AFTER_SECS: u64 = 5;

/// Errors that can occur when interacting with the Shopify Admin API.
///
/// Display strings are for logs only. Clients see the classified
/// [`CountError`] from [`ShopifyError::classify`].
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("Shopify API returned HTTP {0}")]
    Status(StatusCode),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured store URL cannot form an endpoint.
    #[error("Invalid store URL: {0}")]
    InvalidStoreUrl(#[from] url::ParseError),

    /// The access token cannot be sent as a header value.
    #[error("Access token contains characters not allowed in an HTTP header")]
    InvalidAccessToken,
}

impl ShopifyError {
    /// Whether another attempt may succeed.
    ///
    /// Timeouts are never retried, so a stalled upstream fails within one
    /// request timeout.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Status(status) => {
                status.is_server_error() && *status != StatusCode::NOT_IMPLEMENTED
            }
            Self::Http(err) => err.is_connect() && !err.is_timeout(),
            Self::Parse(_) | Self::InvalidStoreUrl(_) | Self::InvalidAccessToken => false,
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    #[must_use]
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::RateLimited(secs) => Duration::from_secs((*secs).clamp(1, MAX_RETRY_AFTER_SECS)),
            _ => BASE_BACKOFF.saturating_mul(1 << attempt.min(5)),
        }
    }

    /// Map to the client-facing taxonomy.
    #[must_use]
    pub fn classify(&self) -> CountError {
        match self {
            Self::Http(err) if err.is_timeout() => CountError::UpstreamTimeout,
            Self::Http(err) if err.is_connect() => {
                CountError::UpstreamUnavailable("connection failed".to_string())
            }
            Self::Http(err) if err.is_body() || err.is_decode() => {
                CountError::UpstreamUnavailable("connection interrupted".to_string())
            }
            Self::Http(_) => CountError::UpstreamUnavailable("request failed".to_string()),
            Self::Status(status) => CountError::UpstreamRejected {
                status: status.as_u16(),
            },
            Self::RateLimited(_) => CountError::UpstreamRejected {
                status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
            },
            Self::Parse(_) => CountError::MalformedResponse,
            Self::InvalidStoreUrl(_) | Self::InvalidAccessToken => {
                CountError::ConfigurationMissing(vec![
                    "SHOPIFY_STORE_URL".to_string(),
                    "SHOPIFY_ACCESS_TOKEN".to_string(),
                ])
            }
        }
    }
}
