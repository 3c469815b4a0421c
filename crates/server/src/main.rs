//! Order Counter - Shopify order count display.
//!
//! This binary serves the flip-counter page and its JSON API on port 5010.
//!
//! # Architecture
//!
//! - Axum web framework, askama template for the display page
//! - Shopify Admin REST API (`orders/count.json`) as the only data source
//! - In-memory count cache via `moka`; nothing is persisted
//!
//! The process refuses to start when required configuration is missing.

#![cfg_attr(not(test), forbid(unsafe_code))]

use order_counter_server::config::{ConfigError, CounterConfig, Environment, REQUIRED_VARS};
use order_counter_server::routes;
use order_counter_server::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CounterConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(config.environment.as_str().into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Production logs are JSON lines; development logs are human-readable.
fn init_tracing(environment: Environment) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "order_counter_server=info,order_counter=info,tower_http=info".into());

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if environment.is_production() {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Log why configuration failed to load.
fn report_config_error(err: &ConfigError) {
    tracing::error!(error = %err, "Cannot start: invalid configuration");
    if matches!(err, ConfigError::MissingEnvVars(_)) {
        tracing::error!(
            required = ?REQUIRED_VARS,
            "Set these environment variables and restart, e.g. \
             SHOPIFY_STORE_URL=your-store.myshopify.com SHOPIFY_ACCESS_TOKEN=shpat_..."
        );
    }
}

#[tokio::main]
async fn main() {
    // Load configuration first; its environment picks the log format
    let config = CounterConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map_or_else(|_| Environment::default(), |c| c.environment),
    );

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            report_config_error(&err);
            std::process::exit(1);
        }
    };

    let _sentry_guard = init_sentry(&config);

    let state = match AppState::new(config.clone()) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "Cannot start: failed to build Shopify client");
            std::process::exit(1);
        }
    };

    tracing::info!(
        environment = config.environment.as_str(),
        store = %config.shopify.store_url,
        reporting_offset = %config.reporting_offset,
        refresh_secs = config.refresh_interval.as_secs(),
        "Configuration validated"
    );

    let app = routes::build_router(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("order counter listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
