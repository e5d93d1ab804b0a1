//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogLoader;
use crate::checkout::CheckoutRedirector;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds no cart data: each
/// request restores its own cart from the visitor's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogLoader,
    checkout: CheckoutRedirector,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogLoader::new(config.catalog_source.clone());
        let checkout = CheckoutRedirector::new(&config.checkout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog loader.
    #[must_use]
    pub fn catalog(&self) -> &CatalogLoader {
        &self.inner.catalog
    }

    /// Get a reference to the checkout redirector.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutRedirector {
        &self.inner.checkout
    }

    /// Label appended to rendered prices.
    #[must_use]
    pub fn currency_label(&self) -> &str {
        &self.inner.config.checkout.currency_label
    }
}
