//! Cart and line item types.

use crate::cart::{CartPricing, LineItemPricing};
use crate::catalog::Product;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize, Serializer};

/// A product in the cart plus how many units the shopper wants.
///
/// Serializes flat, with the product attributes next to `amount`:
/// `{"id":1,"title":"…","price":179.9,"image":"…","amount":2}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// The product, as returned by the catalog when it was added.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity. Always at least 1 inside a [`Cart`].
    amount: i64,
}

impl LineItem {
    /// Create a line item holding one unit of `product`.
    pub fn new(product: Product) -> Self {
        Self {
            product: without_amount(product),
            amount: 1,
        }
    }

    /// Create a line item with an explicit quantity.
    ///
    /// Returns `None` if `amount` is not positive.
    pub fn with_amount(product: Product, amount: i64) -> Option<Self> {
        (amount > 0).then(|| Self {
            product: without_amount(product),
            amount,
        })
    }

    /// Product ID of this line.
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Quantity.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Unit price multiplied by quantity.
    pub fn subtotal(&self, currency: Currency) -> Result<Money, CartError> {
        self.product
            .unit_price(currency)
            .try_multiply(self.amount)
            .ok_or(CartError::Overflow)
    }
}

/// The line's own quantity replaces any `amount` the backend sent with the
/// product; keeping both would write the key twice.
fn without_amount(mut product: Product) -> Product {
    product.extra.remove("amount");
    product
}

/// A shopping cart: line items in insertion order, unique by product id.
///
/// Serializes as a bare JSON array of [`LineItem`]. Deserializing drops any
/// line with a non-positive quantity and any repeated product id, so a cart
/// read back from storage always satisfies the invariants.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items, enforcing the cart invariants.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            if item.amount <= 0 {
                tracing::warn!(product_id = %item.id(), amount = item.amount, "dropping line with non-positive quantity");
                continue;
            }
            let id = item.id();
            if !cart.append(item) {
                tracing::warn!(product_id = %id, "dropping duplicate line");
            }
        }
        cart
    }

    /// Line items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over the line items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Get the line for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id() == product_id)
    }

    /// Check if the cart holds a product.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Quantity of a product in the cart, 0 if absent.
    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.get(product_id).map_or(0, |i| i.amount)
    }

    /// Append a new line at the end.
    ///
    /// Returns `false` and leaves the cart untouched if the product is
    /// already present.
    pub fn append(&mut self, item: LineItem) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of 0 or below removes the line.
    pub fn set_quantity(&mut self, product_id: ProductId, amount: i64) -> Result<(), CartError> {
        let index = self
            .position(product_id)
            .ok_or(CartError::NotFound(product_id))?;
        if amount <= 0 {
            self.items.remove(index);
        } else {
            self.items[index].amount = amount;
        }
        Ok(())
    }

    /// Remove a line, keeping the order of the others.
    pub fn remove(&mut self, product_id: ProductId) -> Option<LineItem> {
        let index = self.position(product_id)?;
        Some(self.items.remove(index))
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.amount).sum()
    }

    /// Get number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Calculate per-line subtotals and the cart total.
    pub fn calculate_pricing(&self, currency: Currency) -> Result<CartPricing, CartError> {
        let line_items = self
            .items
            .iter()
            .map(|item| {
                Ok(LineItemPricing {
                    product_id: item.id(),
                    unit_price: item.product.unit_price(currency),
                    quantity: item.amount,
                    subtotal: item.subtotal(currency)?,
                })
            })
            .collect::<Result<Vec<_>, CartError>>()?;

        let total = Money::try_sum(line_items.iter().map(|l| &l.subtotal), currency)
            .ok_or(CartError::Overflow)?;

        Ok(CartPricing {
            total,
            item_count: self.item_count(),
            line_items,
        })
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.id() == product_id)
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Cart::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
