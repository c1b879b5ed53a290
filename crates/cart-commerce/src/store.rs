//! The cart store: the only place the cart changes.
//!
//! Every operation runs read-validate-mutate-commit while holding the
//! store's mutation lock. A commit replaces the cart state and then notifies
//! each subscribed [`CartObserver`] with the new cart. A rejected operation
//! sends one [`Notice`] to the notifier and leaves the cart exactly as it
//! was.

use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use crate::cart::{Cart, LineItem};
use crate::error::{CartError, LookupError, Operation};
use crate::ids::ProductId;
use crate::lookup::{ProductLookup, StockLookup};
use crate::notify::{Notice, Notifier};

/// Receives the new cart after every committed change.
pub trait CartObserver: Send + Sync {
    fn cart_changed(&self, cart: &Cart);
}

impl<F> CartObserver for F
where
    F: Fn(&Cart) + Send + Sync,
{
    fn cart_changed(&self, cart: &Cart) {
        self(cart)
    }
}

/// Request to set the quantity of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        Self { product_id, amount }
    }
}

/// What a successful quantity update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The line now holds the requested quantity.
    Updated,
    /// The requested quantity was zero or negative; nothing happened.
    Ignored,
}

/// Owner of the cart state.
///
/// Created once by the application's composition root and shared by `Arc`.
/// `cart()` is the read side; `add_product`, `remove_product` and
/// `update_product_amount` are the write side.
pub struct CartStore<L> {
    lookup: L,
    notifier: Arc<dyn Notifier>,
    state: RwLock<Cart>,
    mutation: Mutex<()>,
    observers: RwLock<Vec<Arc<dyn CartObserver>>>,
}

impl<L> CartStore<L>
where
    L: StockLookup + ProductLookup,
{
    /// Create a store holding `initial`.
    ///
    /// No observer is notified about the initial cart.
    pub fn new(lookup: L, notifier: Arc<dyn Notifier>, initial: Cart) -> Self {
        Self {
            lookup,
            notifier,
            state: RwLock::new(initial),
            mutation: Mutex::new(()),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Register an observer for committed changes.
    pub fn subscribe(&self, observer: Arc<dyn CartObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(observer);
    }

    /// Add one unit of a product.
    ///
    /// Creates the line with quantity 1 if the product is not in the cart
    /// yet, fetching its details from the product lookup.
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let result = self.try_add(product_id).await;
        self.finish(Operation::Add, result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let mut cart = self.cart();
        let current = cart.quantity_of(product_id);

        let stock = self
            .lookup
            .stock(product_id)
            .await
            .map_err(|e| CartError::lookup(Operation::Add, e))?;

        let requested = current.saturating_add(1);
        if !stock.can_fulfill(requested) {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.available(),
            });
        }

        if current > 0 {
            cart.set_quantity(product_id, requested)?;
        } else {
            let product = self
                .lookup
                .product(product_id)
                .await
                .map_err(|e| CartError::lookup(Operation::Add, e))?;
            if product.id != product_id {
                return Err(CartError::lookup(
                    Operation::Add,
                    LookupError::Malformed(format!(
                        "asked for product {} but got {}",
                        product_id, product.id
                    )),
                ));
            }
            cart.append(LineItem::new(product));
        }

        tracing::debug!(%product_id, amount = requested, available = stock.available(), "adding product");
        Ok(cart)
    }

    /// Remove a product's line from the cart.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let mut cart = self.cart();
        let result = match cart.remove(product_id) {
            Some(_) => Ok(cart),
            None => Err(CartError::NotFound(product_id)),
        };
        self.finish(Operation::Remove, result)
    }

    /// Set a line's quantity to exactly `amount`.
    ///
    /// A non-positive amount is ignored without touching the cart. The
    /// product must already be in the cart.
    pub async fn update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<UpdateOutcome, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount <= 0 {
            tracing::debug!(%product_id, amount, "ignoring non-positive quantity");
            return Ok(UpdateOutcome::Ignored);
        }

        let _guard = self.mutation.lock().await;
        let result = self.try_update(product_id, amount).await;
        self.finish(Operation::Update, result)
            .map(|()| UpdateOutcome::Updated)
    }

    async fn try_update(&self, product_id: ProductId, amount: i64) -> Result<Cart, CartError> {
        let stock = self
            .lookup
            .stock(product_id)
            .await
            .map_err(|e| CartError::lookup(Operation::Update, e))?;

        if !stock.can_fulfill(amount) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.available(),
            });
        }

        let mut cart = self.cart();
        cart.set_quantity(product_id, amount)?;
        tracing::debug!(%product_id, amount, available = stock.available(), "updating quantity");
        Ok(cart)
    }

    fn finish(&self, operation: Operation, result: Result<Cart, CartError>) -> Result<(), CartError> {
        match result {
            Ok(cart) => {
                self.commit(cart);
                Ok(())
            }
            Err(error) => {
                let notice = Notice::for_error(operation, &error);
                tracing::debug!(%operation, ?notice, error = %error, "cart operation rejected");
                self.notifier.notify(notice);
                Err(error)
            }
        }
    }

    fn commit(&self, cart: Cart) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = cart.clone();

        let observers = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for observer in observers {
            observer.cart_changed(&cart);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::lookup::MemoryCatalog;
    use crate::notify::RecordingNotifier;

    fn product(id: i64) -> Product {
        Product::new(ProductId::new(id), format!("Tênis {id}"), 100.0, "img")
    }

    fn store_with(
        catalog: MemoryCatalog,
        initial: Cart,
    ) -> (CartStore<Arc<MemoryCatalog>>, Arc<MemoryCatalog>, Arc<RecordingNotifier>) {
        let catalog = Arc::new(catalog);
        let notifier = Arc::new(RecordingNotifier::new());
        let store = CartStore::new(catalog.clone(), notifier.clone(), initial);
        (store, catalog, notifier)
    }

    #[tokio::test]
    async fn test_add_new_product() {
        let (store, catalog, notifier) =
            store_with(MemoryCatalog::new().with_product(product(1), 5), Cart::new());

        store.add_product(ProductId::new(1)).await.unwrap();

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 1);
        assert_eq!(catalog.product_calls(), 1);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_skips_product_lookup() {
        let initial = Cart::from_items([LineItem::new(product(1))]);
        let (store, catalog, _) = store_with(MemoryCatalog::new().with_product(product(1), 5), initial);

        store.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(store.cart().quantity_of(ProductId::new(1)), 2);
        assert_eq!(catalog.stock_calls(), 1);
        assert_eq!(catalog.product_calls(), 0);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let initial = Cart::from_items([LineItem::new(product(1))]);
        let (store, _, notifier) =
            store_with(MemoryCatalog::new().with_product(product(1), 1), initial.clone());

        let err = store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(
            err,
            CartError::StockExceeded { requested: 2, available: 1, .. }
        ));
        assert_eq!(store.cart(), initial);
        assert_eq!(notifier.notices(), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_add_lookup_failure() {
        let (store, _, notifier) = store_with(MemoryCatalog::new(), Cart::new());

        let err = store.add_product(ProductId::new(9)).await.unwrap_err();

        assert!(matches!(
            err,
            CartError::LookupFailure { operation: Operation::Add, .. }
        ));
        assert!(store.cart().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_add_product_lookup_failure_after_stock() {
        let catalog = MemoryCatalog::new().with_product(product(1), 5);
        catalog.remove_product(ProductId::new(1));
        let (store, _, notifier) = store_with(catalog, Cart::new());

        assert!(store.add_product(ProductId::new(1)).await.is_err());
        assert!(store.cart().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::AddFailed]);
    }

    #[tokio::test]
    async fn test_remove_missing_product() {
        let (store, _, notifier) = store_with(MemoryCatalog::new(), Cart::new());

        let err = store.remove_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::NotFound(_)));
        assert_eq!(notifier.notices(), vec![Notice::RemoveFailed]);
    }

    #[tokio::test]
    async fn test_update_ignores_non_positive_amount() {
        let initial = Cart::from_items([LineItem::with_amount(product(1), 2).unwrap()]);
        let (store, catalog, notifier) =
            store_with(MemoryCatalog::new().with_product(product(1), 5), initial.clone());

        for amount in [0, -1, i64::MIN] {
            let outcome = store
                .update_product_amount(UpdateProductAmount::new(ProductId::new(1), amount))
                .await
                .unwrap();
            assert_eq!(outcome, UpdateOutcome::Ignored);
        }

        assert_eq!(store.cart(), initial);
        assert_eq!(catalog.stock_calls(), 0);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let (store, _, notifier) =
            store_with(MemoryCatalog::new().with_product(product(1), 5), Cart::new());

        let err = store
            .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 2))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::NotFound(_)));
        assert!(store.cart().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::UpdateFailed]);
    }

    #[tokio::test]
    async fn test_update_checks_stock_first() {
        let initial = Cart::from_items([LineItem::new(product(1))]);
        let (store, _, notifier) =
            store_with(MemoryCatalog::new().with_product(product(1), 3), initial.clone());

        let err = store
            .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 4))
            .await
            .unwrap_err();
        assert!(err.is_stock_exceeded());
        assert_eq!(store.cart(), initial);

        store
            .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3))
            .await
            .unwrap();
        assert_eq!(store.cart().quantity_of(ProductId::new(1)), 3);
        assert_eq!(notifier.notices(), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_observers_see_commits_only() {
        let (store, _, _) = store_with(MemoryCatalog::new().with_product(product(1), 1), Cart::new());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(Arc::new(move |cart: &Cart| {
            sink.lock().unwrap().push(cart.item_count());
        }));

        store.add_product(ProductId::new(1)).await.unwrap();
        assert!(store.add_product(ProductId::new(1)).await.is_err());
        store.remove_product(ProductId::new(1)).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 0]);
    }
}
