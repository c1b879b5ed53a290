//! Stock availability as reported by the inventory backend.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Available stock for one product at the moment it was looked up.
///
/// Records are never cached by the cart: every quantity change asks the
/// inventory service again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockRecord {
    /// Product the record describes.
    pub id: ProductId,
    /// Units available for purchase.
    pub amount: i64,
}

impl StockRecord {
    /// Create a stock record.
    pub fn new(id: ProductId, amount: i64) -> Self {
        Self { id, amount }
    }

    /// Units available for purchase. Negative reports count as none.
    pub fn available(&self) -> i64 {
        self.amount.max(0)
    }

    /// Check if a specific quantity can be held in a cart.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.available()
    }
}
