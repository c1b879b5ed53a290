//! Product catalog module.
//!
//! Contains the product and stock types the cart reads from the backend.

mod inventory;
mod product;

pub use inventory::StockRecord;
pub use product::Product;
