//! Durable mirror of the cart in a key-value store.
//!
//! The cart lives under a single key as a JSON array. It is read once when
//! the application starts and rewritten wholesale by [`PersistCart`] after
//! every committed change.

use cart_cache::{Cache, KvStore};

use crate::cart::Cart;
use crate::store::CartObserver;

/// Storage key the storefront has always used for the cart.
pub const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";

/// Read the cart stored under `key`.
///
/// A missing key, unreadable data, or a failing store all produce an empty
/// cart; none of them is an error for the caller.
pub fn load_cart<S: KvStore>(cache: &Cache<S>, key: &str) -> Cart {
    match cache.get_or_discard::<Cart>(key) {
        Ok(Some(cart)) => {
            tracing::debug!(key, lines = cart.len(), "loaded stored cart");
            cart
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored cart, starting empty");
            Cart::new()
        }
    }
}

/// Observer that writes the cart to storage on every change.
///
/// Writes are synchronous and fire-and-forget: a failed write is logged and
/// the in-memory cart stays authoritative.
#[derive(Debug, Clone)]
pub struct PersistCart<S> {
    cache: Cache<S>,
    key: String,
}

impl<S: KvStore> PersistCart<S> {
    pub fn new(cache: Cache<S>, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// The key the cart is written under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: KvStore> CartObserver for PersistCart<S> {
    fn cart_changed(&self, cart: &Cart) {
        match self.cache.set(&self.key, cart) {
            Ok(()) => tracing::trace!(key = %self.key, lines = cart.len(), "persisted cart"),
            Err(e) => tracing::error!(key = %self.key, error = %e, "failed to persist cart"),
        }
    }
}
