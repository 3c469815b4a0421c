//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::CounterConfig;
use crate::shopify::{OrderCounter, ShopifyError};

/// Application state shared across all handlers.
///
/// Created once at boot and dropped at shutdown. This struct is cheaply
/// cloneable via `Arc` and gives handlers the configuration and the order
/// counter (which owns the store credential and the count cache).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CounterConfig,
    counter: OrderCounter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the order counter cannot be built from the
    /// Shopify configuration.
    pub fn new(config: CounterConfig) -> Result<Self, ShopifyError> {
        let counter = OrderCounter::new(&config.shopify)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, counter }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &CounterConfig {
        &self.inner.config
    }

    /// Get a reference to the order counter.
    #[must_use]
    pub fn counter(&self) -> &OrderCounter {
        &self.inner.counter
    }
}
