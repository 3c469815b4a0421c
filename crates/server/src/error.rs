//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client with a JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use order_counter_core::{CountError, Period, PeriodError};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type for the order counter.
#[derive(Debug, Error)]
pub enum AppError {
    /// A count request that failed before reaching upstream.
    #[error("Count error: {0}")]
    Count(#[from] CountError),

    /// A known period could not be resolved into a range.
    #[error("Period error: {0}")]
    Period(PeriodError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::InvalidPeriod(raw) => Self::Count(CountError::InvalidPeriod(raw)),
            other => Self::Period(other),
        }
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_periods: Option<Vec<&'static str>>,
    timestamp: DateTime<Utc>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Count(err) => count_error_status(err),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Period(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let (error, allowed_periods) = match &self {
            Self::Count(CountError::InvalidPeriod(_)) => (
                "Invalid period parameter".to_string(),
                Some(Period::ALL.iter().map(|p| p.as_str()).collect()),
            ),
            Self::Count(err) => (err.to_string(), None),
            Self::NotFound(what) => (what.clone(), None),
            Self::Period(_) => ("Internal server error".to_string(), None),
        };

        let body = ErrorBody {
            success: false,
            error,
            allowed_periods,
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// HTTP status for a failed order count.
#[must_use]
pub const fn count_error_status(error: &CountError) -> StatusCode {
    match error {
        CountError::InvalidPeriod(_) => StatusCode::BAD_REQUEST,
        CountError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        CountError::UpstreamUnavailable(_)
        | CountError::UpstreamRejected { .. }
        | CountError::MalformedResponse => StatusCode::BAD_GATEWAY,
        CountError::ConfigurationMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
