//! Ports to the storefront backend.
//!
//! The cart needs two reads from the outside world: how many units of a
//! product are in stock, and the full product record when a product enters
//! the cart for the first time. Both are traits so the store can run against
//! the HTTP adapter in production and [`MemoryCatalog`] in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::catalog::{Product, StockRecord};
use crate::error::LookupError;
use crate::ids::ProductId;

/// Current stock for a product.
#[async_trait]
pub trait StockLookup: Send + Sync {
    /// Fetch the stock record. Implementations must not cache.
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError>;
}

/// Full product details.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch the product record.
    async fn product(&self, product_id: ProductId) -> Result<Product, LookupError>;
}

#[async_trait]
impl<T: StockLookup + ?Sized> StockLookup for Arc<T> {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError> {
        (**self).stock(product_id).await
    }
}

#[async_trait]
impl<T: ProductLookup + ?Sized> ProductLookup for Arc<T> {
    async fn product(&self, product_id: ProductId) -> Result<Product, LookupError> {
        (**self).product(product_id).await
    }
}

/// In-memory catalog and inventory.
///
/// Answers both ports from maps that can be changed while a store is using
/// them, and counts how often each port was asked.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, i64>>,
    stock_calls: AtomicUsize,
    product_calls: AtomicUsize,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with the given stock.
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.insert(product, stock);
        self
    }

    /// Add or replace a product and its stock.
    pub fn insert(&self, product: Product, stock: i64) {
        let id = product.id;
        write(&self.products).insert(id, product);
        write(&self.stock).insert(id, stock);
    }

    /// Change the stock of a product.
    pub fn set_stock(&self, product_id: ProductId, amount: i64) {
        write(&self.stock).insert(product_id, amount);
    }

    /// Forget the product record while keeping its stock.
    pub fn remove_product(&self, product_id: ProductId) {
        write(&self.products).remove(&product_id);
    }

    /// Number of stock lookups served so far.
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// Number of product lookups served so far.
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl StockLookup for MemoryCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        read(&self.stock)
            .get(&product_id)
            .map(|amount| StockRecord::new(product_id, *amount))
            .ok_or(LookupError::UnknownProduct(product_id))
    }
}

#[async_trait]
impl ProductLookup for MemoryCatalog {
    async fn product(&self, product_id: ProductId) -> Result<Product, LookupError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        read(&self.products)
            .get(&product_id)
            .cloned()
            .ok_or(LookupError::UnknownProduct(product_id))
    }
}
