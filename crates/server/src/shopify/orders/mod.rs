//! Order count client implementation.
//!
//! Uses `reqwest` for HTTP with a bounded per-request timeout.
//! Caches successful counts using `moka`; failures are never cached.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use order_counter_core::{CountError, DateRange, OrderCountResult, Period, StoreCredential};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue, RETRY_AFTER};
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::ShopifyConfig;
use crate::shopify::ShopifyError;
use crate::shopify::types::{CountResponse, ORDER_STATUS_FILTER};

use cache::CacheKey;

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Upper bound on cached entries; one per period per live bucket is plenty.
const CACHE_CAPACITY: u64 = 256;

// =============================================================================
// OrderCounter
// =============================================================================

/// Client counting orders through the Shopify Admin API.
///
/// Owns the store credential for the lifetime of the process. Cheap to
/// clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct OrderCounter {
    inner: Arc<OrderCounterInner>,
}

struct OrderCounterInner {
    client: reqwest::Client,
    endpoint: Url,
    credential: StoreCredential,
    token_header: HeaderValue,
    max_retries: u32,
    cache: Option<Cache<CacheKey, u64>>,
    cache_ttl: Duration,
}

impl OrderCounter {
    /// Create a new order counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store URL cannot form an endpoint, the token is
    /// not a valid header value, or the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let credential = config.credential();
        let endpoint = count_endpoint(credential.store_url(), &config.api_version)?;

        let mut token_header = HeaderValue::from_str(credential.access_token().expose_secret())
            .map_err(|_| ShopifyError::InvalidAccessToken)?;
        token_header.set_sensitive(true);

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("order-counter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(OrderCounterInner {
                client,
                endpoint,
                credential,
                token_header,
                max_retries: config.max_retries,
                cache,
                cache_ttl: config.cache_ttl,
            }),
        })
    }

    /// The store this counter talks to.
    #[must_use]
    pub fn credential(&self) -> &StoreCredential {
        &self.inner.credential
    }

    /// Full URL of the count endpoint, without filters.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Count orders created within `range`.
    ///
    /// Never fails: upstream errors come back as an unsuccessful
    /// [`OrderCountResult`] carrying a classified, token-free error.
    pub async fn count_orders(&self, period: Period, range: &DateRange) -> OrderCountResult {
        self.count_orders_at(period, range, Utc::now()).await
    }

    /// Same as [`OrderCounter::count_orders`] with an explicit "now", which
    /// selects the cache bucket and stamps the result.
    #[instrument(skip(self, period, range, now), fields(period = %period, range = %range))]
    pub async fn count_orders_at(
        &self,
        period: Period,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> OrderCountResult {
        let missing = missing_credentials(&self.inner.credential);
        if !missing.is_empty() {
            warn!(missing = ?missing, "Order count skipped: store credential incomplete");
            return OrderCountResult::failure(period, CountError::ConfigurationMissing(missing), now);
        }

        let result = match &self.inner.cache {
            Some(cache) => {
                let key = CacheKey::new(period, range, now, self.inner.cache_ttl);
                // Concurrent misses on one key wait for a single fetch
                cache
                    .try_get_with(key, self.fetch_count(range))
                    .await
                    .map_err(|err| err.classify())
            }
            None => self.fetch_count(range).await.map_err(|err| err.classify()),
        };

        match result {
            Ok(count) => {
                info!(count, "Fetched order count");
                OrderCountResult::success(period, count, now)
            }
            Err(error) => {
                warn!(error = %error, "Order count failed");
                OrderCountResult::failure(period, error, now)
            }
        }
    }

    /// Fetch a count, retrying throttled or unavailable responses.
    async fn fetch_count(&self, range: &DateRange) -> Result<u64, ShopifyError> {
        let mut attempt = 0;
        loop {
            match self.request_count(range).await {
                Err(err) if err.is_retryable() && attempt < self.inner.max_retries => {
                    let delay = err.retry_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.inner.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Retrying order count request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Issue a single count request.
    async fn request_count(&self, range: &DateRange) -> Result<u64, ShopifyError> {
        let url = self.filtered_url(range);
        debug!(url = %url, "Requesting order count");

        let response = self
            .inner
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, self.inner.token_header.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // The body may echo request details, so only the status is logged
        if !status.is_success() {
            tracing::error!(status = %status, "Shopify API returned non-success status");
            return Err(ShopifyError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: CountResponse = serde_json::from_slice(&body).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to parse Shopify count response");
        })?;

        Ok(parsed.count())
    }

    /// Endpoint URL with status and date filters applied.
    fn filtered_url(&self, range: &DateRange) -> Url {
        let mut url = self.inner.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("status", ORDER_STATUS_FILTER);
            // Shopify's created_at_max is inclusive; send the last second inside the range
            if let (Some(start), Some(last)) = (range.start(), range.last_second()) {
                query.append_pair("created_at_min", &start.to_rfc3339());
                query.append_pair("created_at_max", &last.to_rfc3339());
            }
        }
        url
    }
}

/// Names of the settings a credential lacks.
fn missing_credentials(credential: &StoreCredential) -> Vec<String> {
    let mut missing = Vec::new();
    if credential.store_url().trim().is_empty() {
        missing.push("SHOPIFY_STORE_URL".to_string());
    }
    if credential.access_token().expose_secret().trim().is_empty() {
        missing.push("SHOPIFY_ACCESS_TOKEN".to_string());
    }
    missing
}

/// Build the count endpoint from a store domain or base URL.
///
/// A bare domain gets `https://`; an explicit scheme is kept as given.
fn count_endpoint(store_url: &str, api_version: &str) -> Result<Url, ShopifyError> {
    let store_url = store_url.trim().trim_end_matches('/');
    let base = if store_url.starts_with("http://") || store_url.starts_with("https://") {
        store_url.to_string()
    } else {
        format!("https://{store_url}")
    };

    Ok(Url::parse(&format!(
        "{base}/admin/api/{api_version}/orders/count.json"
    ))?)
}
