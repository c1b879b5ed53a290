//! Shopping cart state for the storefront.
//!
//! This crate owns the rules for what a cart may contain and how it changes:
//!
//! - **Catalog**: products and stock records as the backend reports them
//! - **Cart**: ordered line items, unique by product, quantities always positive
//! - **Store**: the three cart operations, validated against live stock
//! - **Persistence**: the cart mirrored to a key-value store after every change
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_commerce::prelude::*;
//! use cart_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".cart")?);
//! let store = CartStore::new(api_client, Arc::new(LogNotifier::default()),
//!     load_cart(&cache, DEFAULT_CART_KEY));
//! store.subscribe(Arc::new(PersistCart::new(cache, DEFAULT_CART_KEY)));
//!
//! store.add_product(ProductId::new(1)).await?;
//! store
//!     .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3))
//!     .await?;
//! println!("{} items", store.cart().item_count());
//! ```

pub mod error;
pub mod ids;
pub mod locale;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod lookup;
pub mod notify;
pub mod persist;
pub mod store;

pub use error::{CartError, LookupError, Operation};
pub use ids::ProductId;
pub use locale::Locale;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, LookupError, Operation};
    pub use crate::ids::ProductId;
    pub use crate::locale::Locale;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Product, StockRecord};

    // Cart
    pub use crate::cart::{Cart, CartPricing, LineItem, LineItemPricing};

    // Store
    pub use crate::lookup::{MemoryCatalog, ProductLookup, StockLookup};
    pub use crate::notify::{LogNotifier, Notice, Notifier, RecordingNotifier};
    pub use crate::persist::{load_cart, PersistCart, DEFAULT_CART_KEY};
    pub use crate::store::{CartObserver, CartStore, UpdateOutcome, UpdateProductAmount};
}
