//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! boutique catalog list
//!
//! # Filter by category and search term
//! boutique catalog list --category فساتين --search صيفي
//!
//! # Show one product
//! boutique catalog show 3
//! ```

use boutique_core::{CategoryFilter, ProductId};
use boutique_storefront::catalog::{
    Catalog, CatalogError, CatalogLoader, CatalogQuery, ProductNotFound,
};
use boutique_storefront::config::StorefrontConfig;
use thiserror::Error;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The catalog could not be loaded.
    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    /// No product has the requested id.
    #[error("{0}")]
    NotFound(#[from] ProductNotFound),
}

/// Load the catalog named by the configuration.
///
/// # Errors
///
/// Returns [`CatalogError`] if the document cannot be fetched or parsed.
pub async fn load(config: &StorefrontConfig) -> Result<Catalog, CatalogError> {
    tracing::debug!(source = %config.catalog_source, "Loading catalog");
    CatalogLoader::new(config.catalog_source.clone()).load().await
}

/// List products, optionally filtered.
///
/// # Errors
///
/// Returns [`CatalogCommandError::Catalog`] if the catalog cannot be loaded.
pub async fn list(
    config: &StorefrontConfig,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<(), CatalogCommandError> {
    let catalog = load(config).await?;
    let query = CatalogQuery {
        category: CategoryFilter::parse(category.unwrap_or_default()),
        search: search.unwrap_or_default().to_string(),
    };

    let products = catalog.filter(&query);
    if products.is_empty() {
        tracing::info!("No matching products");
        return Ok(());
    }

    for product in products {
        tracing::info!(
            "{:>4}  {}  [{}]  {}",
            product.id,
            product.title,
            product.category,
            product.price.display_with(&config.checkout.currency_label)
        );
    }
    Ok(())
}

/// Show one product in full.
///
/// # Errors
///
/// Returns [`CatalogCommandError`] if the catalog cannot be loaded or has
/// no product with `id`.
pub async fn show(config: &StorefrontConfig, id: ProductId) -> Result<(), CatalogCommandError> {
    let catalog = load(config).await?;
    let product = catalog.find(id)?;

    tracing::info!("{} (#{})", product.title, product.id);
    tracing::info!("  Category: {}", product.category);
    tracing::info!(
        "  Price: {}",
        product.price.display_with(&config.checkout.currency_label)
    );
    tracing::info!("  {}", product.detail_description());
    if let Some(image) = &product.image {
        tracing::info!("  Image: {}", image);
    }
    Ok(())
}
