//! Health and configuration probes.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::config::REQUIRED_VARS;
use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub config: &'static str,
}

/// Liveness health check endpoint.
///
/// Answers 503 if the store credential is incomplete. Does not call Shopify.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let valid = state.counter().credential().is_complete();

    let (status, health) = if valid {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status,
        Json(HealthResponse {
            status: health,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            config: if valid { "valid" } else { "invalid" },
        }),
    )
}

/// Presence of each required setting. Values are never echoed.
#[derive(Debug, Serialize)]
pub struct ConfigStatus {
    pub shopify_store_url: &'static str,
    pub shopify_access_token: &'static str,
}

/// Hints returned when configuration is incomplete.
#[derive(Debug, Serialize)]
pub struct ConfigHelp {
    pub required_variables: [&'static str; 2],
    pub example: ConfigExample,
}

#[derive(Debug, Serialize)]
pub struct ConfigExample {
    #[serde(rename = "SHOPIFY_STORE_URL")]
    pub store_url: &'static str,
    #[serde(rename = "SHOPIFY_ACCESS_TOKEN")]
    pub access_token: &'static str,
}

/// Configuration check response.
#[derive(Debug, Serialize)]
pub struct ConfigCheckResponse {
    pub success: bool,
    pub message: &'static str,
    pub config: ConfigStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<ConfigHelp>,
    pub timestamp: DateTime<Utc>,
}

const fn presence(set: bool) -> &'static str {
    if set { "set" } else { "missing" }
}

/// Configuration check endpoint.
///
/// Answers 400 with setup hints when a required setting is missing.
pub async fn config_check(State(state): State<AppState>) -> (StatusCode, Json<ConfigCheckResponse>) {
    let credential = state.counter().credential();
    let url_set = !credential.store_url().trim().is_empty();
    let token_set = !credential.access_token().expose_secret().trim().is_empty();

    let config = ConfigStatus {
        shopify_store_url: presence(url_set),
        shopify_access_token: presence(token_set),
    };

    if url_set && token_set {
        return (
            StatusCode::OK,
            Json(ConfigCheckResponse {
                success: true,
                message: "All required configuration is set",
                config,
                help: None,
                timestamp: Utc::now(),
            }),
        );
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ConfigCheckResponse {
            success: false,
            message: "Missing required environment variables",
            config,
            help: Some(ConfigHelp {
                required_variables: REQUIRED_VARS,
                example: ConfigExample {
                    store_url: "your-store.myshopify.com",
                    access_token: "shpat_your_token_here",
                },
            }),
            timestamp: Utc::now(),
        }),
    )
}
