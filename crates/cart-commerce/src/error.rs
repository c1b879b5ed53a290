//! Cart error types.

use crate::ids::ProductId;
use std::fmt;
use thiserror::Error;

/// The cart operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Adding one unit of a product.
    Add,
    /// Removing a line item.
    Remove,
    /// Setting a line item's quantity.
    Update,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::Update => "update",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by cart operations.
///
/// By the time a caller sees one of these, the matching notice has already
/// been sent to the notifier and the cart is exactly as it was before the
/// call.
#[derive(Error, Debug)]
pub enum CartError {
    /// Requested quantity exceeds available inventory.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The operation needs a line item that is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// The product or stock lookup failed.
    #[error("Lookup failed during {operation}: {source}")]
    LookupFailure {
        operation: Operation,
        #[source]
        source: LookupError,
    },

    /// Arithmetic overflow in a price calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

impl CartError {
    /// Wrap a lookup error for the given operation.
    pub fn lookup(operation: Operation, source: LookupError) -> Self {
        CartError::LookupFailure { operation, source }
    }

    /// Whether the rejection came from an inventory check.
    pub fn is_stock_exceeded(&self) -> bool {
        matches!(self, CartError::StockExceeded { .. })
    }
}

/// Errors reported by the product and stock lookup ports.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The backend does not know the product.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The backend answered with something that is not a valid record.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The backend could not be reached or answered with an error.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}
