//! Order count API.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::Utc;
use order_counter_core::{CountError, OrderCountResult, Period};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, count_error_status};
use crate::state::AppState;

/// Query parameters for the count endpoint.
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    /// Period tag; `all-time` when absent.
    pub period: Option<String>,
}

/// Order count for the requested period.
///
/// Unknown periods and unreadable query strings answer 400 before anything
/// is sent upstream. Upstream failures still answer with an
/// `OrderCountResult` body, under 502 or 504.
#[instrument(skip(state, query))]
pub async fn count(
    State(state): State<AppState>,
    query: std::result::Result<Query<CountQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<OrderCountResult>)> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected count query string");
        CountError::InvalidPeriod(rejection.body_text())
    })?;

    let period = match query.period.as_deref() {
        Some(raw) => Period::parse(raw)?,
        None => Period::default(),
    };

    let now = Utc::now();
    let range = period.resolve(now, &state.config().reporting_offset)?;
    let result = state.counter().count_orders_at(period, &range, now).await;

    let status = result
        .failure_kind()
        .map_or(StatusCode::OK, count_error_status);

    Ok((status, Json(result)))
}
