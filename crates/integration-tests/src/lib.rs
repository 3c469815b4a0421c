//! Integration tests for the order counter.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p order-counter-integration-tests
//! ```
//!
//! Nothing external is required: every test starts a [`StubUpstream`] on
//! `127.0.0.1:0` that answers the Admin API count endpoint, and points a
//! [`CounterConfig`] at it with [`test_config`].
//!
//! # Test Categories
//!
//! - `order_counter` - upstream client: counts, retries, timeouts, cache
//! - `http_api` - full router driven with `tower::ServiceExt::oneshot`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Offset, Utc};
use order_counter_server::config::{CounterConfig, Environment, ShopifyConfig};
use secrecy::SecretString;
use serde_json::json;

/// Access token configured for every test counter.
pub const TEST_TOKEN: &str = "shpat_f3a9c1d47e2b8065aa91";

/// Path the stub answers on, matching the default API version.
const COUNT_PATH: &str = "/admin/api/{version}/orders/count.json";

/// How the stub answers count requests.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// `{"orders": [...]}` with `n` entries.
    Orders(usize),
    /// `{"count": n}`.
    Count(u64),
    /// A fixed status with a short JSON error body.
    Status(StatusCode),
    /// A body that is not JSON.
    Garbage,
    /// Never answers.
    Hang,
    /// Answers `{"count": n}` after a delay.
    Delayed(Duration, u64),
    /// Fails the first `failures` requests with `status`, then counts.
    ///
    /// A 429 carries `Retry-After: 1`.
    FailThen {
        failures: usize,
        status: StatusCode,
        count: u64,
    },
}

struct StubState {
    behavior: Behavior,
    hits: AtomicUsize,
    last_query: Mutex<Option<String>>,
    last_token: Mutex<Option<String>>,
}

/// In-process stand-in for the Shopify Admin API.
pub struct StubUpstream {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubUpstream {
    /// Bind to an ephemeral port and serve `behavior` until the test runtime ends.
    pub async fn spawn(behavior: Behavior) -> Self {
        let state = Arc::new(StubState {
            behavior,
            hits: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            last_token: Mutex::new(None),
        });

        let app = Router::new()
            .route(COUNT_PATH, get(count_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub upstream");
        let addr = listener.local_addr().expect("stub upstream address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL to use as `SHOPIFY_STORE_URL`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of count requests received.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Raw query string of the latest request.
    pub fn last_query(&self) -> Option<String> {
        self.state.last_query.lock().expect("stub lock").clone()
    }

    /// `X-Shopify-Access-Token` of the latest request.
    pub fn last_token(&self) -> Option<String> {
        self.state.last_token.lock().expect("stub lock").clone()
    }
}

async fn count_handler(
    State(state): State<Arc<StubState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().expect("stub lock") = query;
    *state.last_token.lock().expect("stub lock") = headers
        .get("x-shopify-access-token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match &state.behavior {
        Behavior::Orders(n) => {
            let orders: Vec<_> = (0..*n).map(|id| json!({ "id": id })).collect();
            Json(json!({ "orders": orders })).into_response()
        }
        Behavior::Count(count) => Json(json!({ "count": count })).into_response(),
        Behavior::Status(status) => {
            (*status, Json(json!({ "errors": "stubbed failure" }))).into_response()
        }
        Behavior::Garbage => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        Behavior::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
        Behavior::Delayed(delay, count) => {
            tokio::time::sleep(*delay).await;
            Json(json!({ "count": count })).into_response()
        }
        Behavior::FailThen {
            failures,
            status,
            count,
        } => {
            if hit >= *failures {
                Json(json!({ "count": count })).into_response()
            } else if *status == StatusCode::TOO_MANY_REQUESTS {
                (*status, [(RETRY_AFTER, "1")], "Too Many Requests").into_response()
            } else {
                (*status, Json(json!({ "errors": "stubbed failure" }))).into_response()
            }
        }
    }
}

/// Configuration pointing at `store_url` with retries and cache disabled.
pub fn test_config(store_url: &str) -> CounterConfig {
    CounterConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        environment: Environment::Development,
        allowed_origins: Vec::new(),
        refresh_interval: Duration::from_secs(30),
        reporting_offset: Utc.fix(),
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../server/static")),
        shopify: ShopifyConfig {
            store_url: store_url.to_string(),
            access_token: SecretString::from(TEST_TOKEN),
            api_version: "2023-10".to_string(),
            request_timeout: Duration::from_secs(2),
            max_retries: 0,
            cache_ttl: Duration::ZERO,
        },
        sentry_dsn: None,
    }
}

/// An address nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway address");
    drop(listener);
    format!("http://{addr}")
}
