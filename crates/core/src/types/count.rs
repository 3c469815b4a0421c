//! Order count results and their failure taxonomy.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::period::Period;

/// Classified reasons an order count could not be produced.
///
/// Every message is safe to show to a client: none of them carry the access
/// token or the raw upstream response body.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountError {
    /// The caller asked for a period that does not exist.
    #[error("Invalid period parameter: '{0}'")]
    InvalidPeriod(String),

    /// The upstream API could not be reached.
    #[error("Order service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream API did not answer within the request timeout.
    #[error("Order service timed out")]
    UpstreamTimeout,

    /// The upstream API answered with a non-success status.
    #[error("Order service rejected the request (HTTP {status})")]
    UpstreamRejected {
        /// HTTP status returned by the upstream API.
        status: u16,
    },

    /// The upstream API answered 2xx with a body we could not read.
    #[error("Order service returned an unreadable response")]
    MalformedResponse,

    /// Required store configuration is absent.
    #[error("Missing required configuration: {}", .0.join(", "))]
    ConfigurationMissing(Vec<String>),
}

/// Result of one order count request.
///
/// Serializes to the wire shape
/// `{"success", "count", "period", "timestamp", "error"}`. The classified
/// [`CountError`] travels alongside for the HTTP layer but is not serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCountResult {
    pub success: bool,
    pub count: Option<u64>,
    pub period: Period,
    pub timestamp: DateTime<Utc>,
    pub error: Option<String>,
    #[serde(skip)]
    failure: Option<CountError>,
}

impl OrderCountResult {
    /// A successful count.
    #[must_use]
    pub const fn success(period: Period, count: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            count: Some(count),
            period,
            timestamp,
            error: None,
            failure: None,
        }
    }

    /// A failed count.
    #[must_use]
    pub fn failure(period: Period, error: CountError, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            count: None,
            period,
            timestamp,
            error: Some(error.to_string()),
            failure: Some(error),
        }
    }

    /// The classified failure, if the count failed.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<&CountError> {
        self.failure.as_ref()
    }
}
