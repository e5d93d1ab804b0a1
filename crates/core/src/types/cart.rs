//! Shopping cart contents.
//!
//! [`Cart`] is the pure in-memory model: an ordered list of product
//! snapshots with quantities. Persistence and change notification live in
//! the storefront's `CartStore`, which wraps a `Cart`.
//!
//! # Serialized form
//!
//! A JSON array in first-added order:
//!
//! ```text
//! [{"product": {"id": 7, "title": "Dress A", ...}, "quantity": 2}, ...]
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Product, ProductId};

/// Errors decoding a persisted cart.
#[derive(Debug, thiserror::Error)]
pub enum CartStateError {
    /// The bytes are not a JSON array of cart entries.
    #[error("cart is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Two entries reference the same product.
    #[error("cart holds more than one entry for product {0}")]
    DuplicateProduct(ProductId),

    /// An entry has a quantity of zero.
    #[error("cart entry for product {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// An entry references a product with an unusable id.
    #[error("cart entry references invalid product id {0}")]
    InvalidProduct(ProductId),
}

/// One line of the cart: a product snapshot taken when it was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

/// An ordered collection of [`CartEntry`], at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Decode a persisted cart.
    ///
    /// Empty or whitespace-only input decodes to an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartStateError`] if the bytes are not a JSON array of
    /// entries, or if the entries break the one-entry-per-product or
    /// positive-quantity invariants.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CartStateError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        let entries: Vec<CartEntry> = serde_json::from_slice(bytes)?;

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            let id = entry.product.id;
            if !id.is_valid() {
                return Err(CartStateError::InvalidProduct(id));
            }
            if entry.quantity == 0 {
                return Err(CartStateError::ZeroQuantity(id));
            }
            if !seen.insert(id) {
                return Err(CartStateError::DuplicateProduct(id));
            }
        }

        Ok(Self { entries })
    }

    /// Encode the cart to its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.entries)
    }

    /// Add one unit of `product`, returning the entry's new quantity.
    ///
    /// An existing entry keeps its original snapshot and only its quantity
    /// changes; otherwise a new entry is appended.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.product.id == product.id)
        {
            entry.quantity = entry.quantity.saturating_add(1);
            return entry.quantity;
        }

        self.entries.push(CartEntry {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Remove the entry for `id`, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.product.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of quantities across all entries.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    /// Look up the entry for `id`.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.product.id == id)
    }

    /// Entries in first-added order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
