//! Local cart commands.
//!
//! The cart lives in a `cart` file under the data directory, in the same
//! JSON shape the storefront keeps in its session.
//!
//! # Usage
//!
//! ```bash
//! boutique cart add 3
//! boutique cart remove 3
//! boutique cart clear
//! boutique cart show
//! boutique checkout
//! ```

use std::path::Path;

use boutique_core::{Cart, ProductId};
use boutique_storefront::cart::{CartStore, CartStoreError, DirectoryStore};
use boutique_storefront::checkout::{CheckoutError, CheckoutRedirector};
use boutique_storefront::config::StorefrontConfig;
use thiserror::Error;

use super::catalog::{self, CatalogCommandError};

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Looking up the product failed.
    #[error(transparent)]
    Catalog(#[from] CatalogCommandError),

    /// The cart file could not be written.
    #[error("Failed to save cart: {0}")]
    Store(#[from] CartStoreError),

    /// Checkout was requested with nothing in the cart.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),
}

fn open(data_dir: &Path) -> CartStore<DirectoryStore> {
    let mut store = CartStore::restore(DirectoryStore::new(data_dir));
    store.on_change(|change, cart| {
        tracing::debug!(?change, items = cart.total_item_count(), "Cart changed");
    });
    store
}

/// Write the cart again so a failed save becomes a non-zero exit.
fn save(mut store: CartStore<DirectoryStore>) -> Result<Cart, CartCommandError> {
    store.persist()?;
    Ok(store.cart().clone())
}

/// Add one unit of product `id`.
///
/// # Errors
///
/// Returns [`CartCommandError`] if the product is unknown or the cart
/// cannot be saved.
pub async fn add(
    config: &StorefrontConfig,
    data_dir: &Path,
    id: ProductId,
) -> Result<(), CartCommandError> {
    let catalog = catalog::load(config)
        .await
        .map_err(CatalogCommandError::from)?;
    let product = catalog.find(id).map_err(CatalogCommandError::from)?;

    let mut store = open(data_dir);
    store.add(product);
    let cart = save(store)?;

    let quantity = cart.get(id).map_or(0, |entry| entry.quantity);
    tracing::info!(
        "Added {} ({}x). Cart now holds {} item(s).",
        product.title,
        quantity,
        cart.total_item_count()
    );
    Ok(())
}

/// Remove the entry for product `id`. Absent ids are a no-op.
///
/// # Errors
///
/// Returns [`CartCommandError::Store`] if the cart cannot be saved.
pub fn remove(data_dir: &Path, id: ProductId) -> Result<(), CartCommandError> {
    let mut store = open(data_dir);
    let present = store.cart().get(id).is_some();
    store.remove(id);
    let cart = save(store)?;

    if present {
        tracing::info!(
            "Removed product {id}. Cart now holds {} item(s).",
            cart.total_item_count()
        );
    } else {
        tracing::info!("Product {id} was not in the cart");
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns [`CartCommandError::Store`] if the cart cannot be saved.
pub fn clear(data_dir: &Path) -> Result<(), CartCommandError> {
    let mut store = open(data_dir);
    store.clear();
    save(store)?;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Print the cart contents.
pub fn show(config: &StorefrontConfig, data_dir: &Path) {
    let store = open(data_dir);
    let cart = store.cart();

    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for entry in cart.entries() {
        tracing::info!(
            "{:>4}  {}  {}x  {}",
            entry.product.id,
            entry.product.title,
            entry.quantity,
            entry
                .product
                .price
                .display_with(&config.checkout.currency_label)
        );
    }
    tracing::info!("Total items: {}", cart.total_item_count());
}

/// Print the WhatsApp order link for the cart. The cart is left intact.
///
/// # Errors
///
/// Returns [`CartCommandError::Checkout`] if the cart is empty.
pub fn checkout(config: &StorefrontConfig, data_dir: &Path) -> Result<(), CartCommandError> {
    let store = open(data_dir);
    let url = CheckoutRedirector::new(&config.checkout).cart_order_url(store.cart())?;

    tracing::info!("Open this link to send the order:");
    tracing::info!("  {}", url);
    Ok(())
}
