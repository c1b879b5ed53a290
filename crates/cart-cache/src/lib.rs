//! Type-safe Key-Value storage layer for the storefront cart.
//!
//! Provides a small, ergonomic API over a string key-value store (in memory
//! or on disk) with automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".cart")?);
//!
//! // Store a value
//! cache.set("@RocketShoes:cart", &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Vec<LineItem>> = cache.get("@RocketShoes:cart")?;
//!
//! // Delete a value
//! cache.delete("@RocketShoes:cart")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
