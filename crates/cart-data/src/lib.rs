//! HTTP adapter for the cart's stock and product lookups.
//!
//! This crate provides:
//! - `ApiClient` - Backend client implementing `StockLookup` and `ProductLookup`
//! - `DependencyTag` - Semantic dependency categories
//! - `TimeoutConfig` - Per-dependency timeouts
//! - `RetryPolicy` - Retry strategies

mod client;
mod dependency;
mod retry;
mod timeout;

pub use client::*;
pub use dependency::*;
pub use retry::*;
pub use timeout::*;
