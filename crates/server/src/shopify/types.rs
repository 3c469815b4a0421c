//! Wire types for Shopify Admin REST API responses.

use serde::Deserialize;
use serde::de::IgnoredAny;

/// Order status filter sent with every count request.
///
/// `any` covers open, closed and cancelled orders, so the number shown is the
/// store's total order count rather than only unfulfilled orders.
pub const ORDER_STATUS_FILTER: &str = "any";

/// Body of a successful count request.
///
/// `orders/count.json` answers `{"count": N}`; a listing body
/// `{"orders": [...]}` is counted by length.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CountResponse {
    Count { count: u64 },
    Orders { orders: Vec<IgnoredAny> },
}

impl CountResponse {
    /// Number of orders reported.
    #[must_use]
    pub fn count(&self) -> u64 {
        match self {
            Self::Count { count } => *count,
            Self::Orders { orders } => u64::try_from(orders.len()).unwrap_or(u64::MAX),
        }
    }
}
