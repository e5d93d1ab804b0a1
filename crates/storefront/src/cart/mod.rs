//! Cart Store: the authoritative cart for one visitor, kept in sync with a
//! key-value slot.
//!
//! Every mutation (`add`, `remove`, `clear`) persists the whole cart to the
//! [`CART_KEY`] slot and then notifies registered listeners, so a reload
//! never loses more than the operation in flight.
//!
//! # Backends
//!
//! - [`SessionSnapshot`] - the visitor's HTTP session (storefront)
//! - [`DirectoryStore`] - a file in a data directory (CLI)
//! - [`MemoryStore`] - tests
//!
//! # Example
//!
//! ```rust,ignore
//! let mut store = CartStore::restore(MemoryStore::new());
//! store.on_change(|change, cart| tracing::debug!(?change, items = cart.total_item_count()));
//! store.add(&product);
//! assert_eq!(store.total_item_count(), 1);
//! ```

mod session;
mod storage;

pub use session::SessionSnapshot;
pub use storage::{DirectoryStore, KeyValueStore, MemoryStore, StorageError};

use boutique_core::{Cart, CartStateError, Product, ProductId};
use thiserror::Error;

/// Name of the slot holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Errors from the Cart Store.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Persisted bytes could not be decoded (`CorruptState`).
    #[error("corrupt persisted cart: {0}")]
    CorruptState(#[from] CartStateError),

    /// The backing store failed.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be encoded.
    #[error("cart encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The slot could not be read at restore time; writing would clobber it.
    #[error("cart slot was unreadable at restore, refusing to overwrite it")]
    SlotUnreadable,
}

/// What a mutation did, delivered to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// One unit of a product was added; `quantity` is the new total.
    Added { product_id: ProductId, quantity: u32 },
    /// A remove was requested; `removed` is false when the id was absent.
    Removed { product_id: ProductId, removed: bool },
    /// Every entry was dropped.
    Cleared,
}

type Listener = Box<dyn FnMut(&CartChange, &Cart) + Send>;

/// The cart plus its persistence slot and change listeners.
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    listeners: Vec<Listener>,
    /// Set when the slot failed to read; writes are refused from then on.
    slot_unreadable: bool,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Read the persisted cart from `storage`.
    ///
    /// An absent or empty slot is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::CorruptState`] if the slot holds bytes that
    /// do not decode to a valid cart, or [`CartStoreError::Storage`] if the
    /// slot cannot be read.
    pub fn load(storage: &S) -> Result<Cart, CartStoreError> {
        match storage.get(CART_KEY)? {
            Some(bytes) => Ok(Cart::from_slice(&bytes)?),
            None => Ok(Cart::new()),
        }
    }

    /// Restore the cart from `storage`, or start empty.
    ///
    /// Corrupt state is logged and discarded; the next mutation overwrites
    /// the slot. A slot that cannot be read at all also starts empty, but the
    /// store then refuses to write so the unread bytes survive.
    pub fn restore(storage: S) -> Self {
        match Self::load(&storage) {
            Ok(cart) => Self::with_cart(cart, storage),
            Err(CartStoreError::CorruptState(e)) => {
                tracing::warn!(error = %e, "Discarding corrupt persisted cart, starting empty");
                Self::with_cart(Cart::new(), storage)
            }
            Err(e) => {
                tracing::error!(error = %e, "Cart slot unreadable, cart will not be persisted");
                let mut store = Self::with_cart(Cart::new(), storage);
                store.slot_unreadable = true;
                store
            }
        }
    }

    /// Restore the cart from `storage`, surfacing corrupt state.
    ///
    /// # Errors
    ///
    /// Returns the [`CartStoreError`] from [`Self::load`] together with the
    /// storage, so the caller can fall back to [`Self::restore`] or reset.
    pub fn try_restore(storage: S) -> Result<Self, (CartStoreError, S)> {
        match Self::load(&storage) {
            Ok(cart) => Ok(Self::with_cart(cart, storage)),
            Err(e) => Err((e, storage)),
        }
    }

    const fn with_cart(cart: Cart, storage: S) -> Self {
        Self {
            cart,
            storage,
            listeners: Vec::new(),
            slot_unreadable: false,
        }
    }

    /// Register a listener called after every mutation.
    pub fn on_change(&mut self, listener: impl FnMut(&CartChange, &Cart) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add one unit of `product`.
    ///
    /// Merges into the existing entry for the same id, otherwise appends a
    /// snapshot of the product.
    pub fn add(&mut self, product: &Product) {
        let quantity = self.cart.add(product);
        tracing::debug!(product_id = %product.id, quantity, "Added to cart");
        self.commit(CartChange::Added {
            product_id: product.id,
            quantity,
        });
    }

    /// Remove the entry for `product_id`. Absent ids are a no-op.
    pub fn remove(&mut self, product_id: ProductId) {
        let removed = self.cart.remove(product_id).is_some();
        tracing::debug!(product_id = %product_id, removed, "Removed from cart");
        self.commit(CartChange::Removed {
            product_id,
            removed,
        });
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        tracing::debug!("Cleared cart");
        self.commit(CartChange::Cleared);
    }

    /// Sum of quantities, for the badge.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Serialize the cart and overwrite the [`CART_KEY`] slot.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError`] if encoding or the storage write fails,
    /// or [`CartStoreError::SlotUnreadable`] if the slot failed to read when
    /// the store was restored.
    pub fn persist(&mut self) -> Result<(), CartStoreError> {
        if self.slot_unreadable {
            return Err(CartStoreError::SlotUnreadable);
        }
        let bytes = self.cart.to_vec()?;
        self.storage.set(CART_KEY, bytes)?;
        Ok(())
    }

    /// Give back the storage, e.g. to flush a session snapshot.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Persist, then notify. A failed write leaves the in-memory cart
    /// authoritative for the rest of the request.
    fn commit(&mut self, change: CartChange) {
        if let Err(e) = self.persist() {
            tracing::error!(error = %e, ?change, "Failed to persist cart");
        }
        for listener in &mut self.listeners {
            listener(&change, &self.cart);
        }
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
