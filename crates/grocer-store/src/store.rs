//! # Store
//!
//! The transactional facade over [`StoreState`] and a [`Persistence`]
//! backend.
//!
//! ## Mutation Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store::mutate                                      │
//! │                                                                         │
//! │  lock state ─► clone ─► pure transition ─► save(&copy) ─► swap ─► unlock│
//! │                             │                  │                        │
//! │                             └─ Err: drop copy  └─ Err: drop copy       │
//! │                                                                         │
//! │  The lock is held across the save, so mutations are serialized even   │
//! │  when several tasks share one Store. Reads lock briefly and return     │
//! │  owned snapshots.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::persistence::Persistence;
use grocer_core::{
    new_id, CoreError, CoreResult, NewProduct, NewSupplier, NewUser, Order, Product, Sale,
    StockPolicy, StoreState, Supplier, User,
};

/// Catalog, ledger and directory behind a single writer.
pub struct Store {
    persistence: Arc<dyn Persistence>,
    state: Mutex<StoreState>,
    policy: StockPolicy,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("persistence", &self.persistence.describe())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Loads the persisted state.
    ///
    /// Empty supplier or user lists are seeded with starter entries, and
    /// the seeded state is saved right away.
    pub async fn open(persistence: Arc<dyn Persistence>, policy: StockPolicy) -> StoreResult<Self> {
        let mut state = persistence.load().await?;

        if state.seed_directory() {
            info!(backend = %persistence.describe(), "Seeded supplier and user directory");
            persistence.save(&state).await?;
        }

        info!(
            backend = %persistence.describe(),
            products = state.products.len(),
            sales = state.sales.len(),
            policy = %policy,
            "Store opened"
        );

        Ok(Store {
            persistence,
            state: Mutex::new(state),
            policy,
        })
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.policy
    }

    /// Location of the backend, for display.
    pub fn backend(&self) -> String {
        self.persistence.describe()
    }

    /// Owned copy of the whole state (for reports).
    pub async fn snapshot(&self) -> StoreState {
        self.state.lock().await.clone()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Every product, in insertion order.
    pub async fn products(&self) -> Vec<Product> {
        self.state.lock().await.products.clone()
    }

    pub async fn get_product(&self, id: &str) -> Option<Product> {
        self.state.lock().await.product(id).cloned()
    }

    pub async fn find_by_barcode(&self, barcode: &str) -> Option<Product> {
        self.state.lock().await.find_by_barcode(barcode).cloned()
    }

    /// Case-insensitive name or barcode substring search.
    pub async fn search_products(&self, term: &str) -> StoreResult<Vec<Product>> {
        let state = self.state.lock().await;
        let found = state.search_products(term)?;
        Ok(found.into_iter().cloned().collect())
    }

    /// Adds a product under a fresh UUID.
    pub async fn add_product(&self, draft: NewProduct) -> StoreResult<Product> {
        debug!(name = %draft.name, "Adding product");

        let product = self
            .mutate(move |state| state.add_product(new_id(), draft))
            .await?;

        info!(id = %product.id, name = %product.name, "Product added");
        Ok(product)
    }

    /// Replaces an existing product.
    pub async fn update_product(&self, product: Product) -> StoreResult<()> {
        let id = product.id.clone();
        debug!(id = %id, "Updating product");

        self.mutate(move |state| state.update_product(product)).await?;

        info!(id = %id, "Product updated");
        Ok(())
    }

    /// Removes a product. Past sales keep referencing its id.
    pub async fn delete_product(&self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting product");

        let removed = self.mutate(|state| state.delete_product(id)).await?;

        info!(id = %id, name = %removed.name, "Product deleted");
        Ok(())
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Every sale, in commit order.
    pub async fn sales(&self) -> Vec<Sale> {
        self.state.lock().await.sales.clone()
    }

    pub async fn get_sale(&self, id: &str) -> Option<Sale> {
        self.state.lock().await.sale(id).cloned()
    }

    /// Records a sale and applies its stock decrements in one save.
    ///
    /// ## Errors
    /// - `EmptyOrder`, `Validation`, `InsufficientStock` before anything changes
    /// - Any backend error; the in-memory state is left as it was
    pub async fn commit(&self, order: Order) -> StoreResult<Sale> {
        debug!(
            lines = order.items.len(),
            total = %order.total,
            payment_method = %order.payment_method,
            "Committing order"
        );

        let policy = self.policy;
        let commit = self
            .mutate(move |state| state.commit_order(order, new_id(), Utc::now(), policy))
            .await?;

        for product_id in &commit.unknown_products {
            warn!(
                sale_id = %commit.sale.id,
                product_id = %product_id,
                "Dropped stock delta for unknown product"
            );
        }

        info!(
            sale_id = %commit.sale.id,
            total = %commit.sale.total,
            items = commit.sale.items.len(),
            "Sale recorded"
        );
        Ok(commit.sale)
    }

    // =========================================================================
    // Directory
    // =========================================================================

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.state.lock().await.suppliers.clone()
    }

    pub async fn add_supplier(&self, draft: NewSupplier) -> StoreResult<Supplier> {
        let supplier = self
            .mutate(move |state| state.add_supplier(new_id(), draft))
            .await?;

        info!(id = %supplier.id, name = %supplier.name, "Supplier added");
        Ok(supplier)
    }

    pub async fn update_supplier(&self, supplier: Supplier) -> StoreResult<()> {
        let id = supplier.id.clone();
        self.mutate(move |state| state.update_supplier(supplier)).await?;

        info!(id = %id, "Supplier updated");
        Ok(())
    }

    pub async fn delete_supplier(&self, id: &str) -> StoreResult<()> {
        self.mutate(|state| state.delete_supplier(id)).await?;

        info!(id = %id, "Supplier deleted");
        Ok(())
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.lock().await.users.clone()
    }

    pub async fn user_by_username(&self, username: &str) -> Option<User> {
        self.state.lock().await.user_by_username(username).cloned()
    }

    /// Adds a staff account on behalf of `actor` (a username).
    pub async fn add_user(&self, actor: &str, draft: NewUser) -> StoreResult<User> {
        let user = self
            .mutate(move |state| {
                let actor = resolve_actor(state, actor)?;
                state.add_user(&actor, new_id(), draft)
            })
            .await?;

        info!(id = %user.id, username = %user.username, role = %user.role, "User added");
        Ok(user)
    }

    pub async fn update_user(&self, actor: &str, user: User) -> StoreResult<()> {
        let id = user.id.clone();
        self.mutate(move |state| {
            let actor = resolve_actor(state, actor)?;
            state.update_user(&actor, user)
        })
        .await?;

        info!(id = %id, "User updated");
        Ok(())
    }

    pub async fn delete_user(&self, actor: &str, id: &str) -> StoreResult<()> {
        self.mutate(|state| {
            let actor = resolve_actor(state, actor)?;
            state.delete_user(&actor, id)
        })
        .await?;

        info!(id = %id, "User deleted");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Runs `transition` on a working copy, saves it, then swaps it in.
    async fn mutate<T>(
        &self,
        transition: impl FnOnce(&mut StoreState) -> CoreResult<T>,
    ) -> StoreResult<T> {
        let mut guard = self.state.lock().await;

        let mut working = guard.clone();
        let output = transition(&mut working)?;

        self.persistence.save(&working).await?;
        *guard = working;

        Ok(output)
    }
}

fn resolve_actor(state: &StoreState, username: &str) -> CoreResult<User> {
    state
        .user_by_username(username)
        .cloned()
        .ok_or_else(|| CoreError::UserNotFound(username.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::persistence::MemoryPersistence;
    use grocer_core::{Money, PaymentMethod, Role, SaleLineItem};

    fn milk() -> Product {
        Product {
            id: "p1".to_string(),
            name: "Milk".to_string(),
            price: Money::from_cents(250),
            stock: 10,
            barcode: "111".to_string(),
        }
    }

    fn order(items: Vec<SaleLineItem>, total_cents: i64) -> Order {
        Order {
            items,
            total: Money::from_cents(total_cents),
            payment_method: PaymentMethod::Cash,
        }
    }

    async fn milk_store(policy: StockPolicy) -> (Arc<MemoryPersistence>, Store) {
        let backend = Arc::new(MemoryPersistence::with_state(StoreState::new(
            vec![milk()],
            Vec::new(),
        )));
        let store = Store::open(backend.clone(), policy).await.unwrap();
        (backend, store)
    }

    #[tokio::test]
    async fn test_open_seeds_and_saves_directory() {
        let backend = Arc::new(MemoryPersistence::new());
        let store = Store::open(backend.clone(), StockPolicy::default())
            .await
            .unwrap();

        assert_eq!(store.suppliers().await.len(), 2);
        assert_eq!(store.users().await.len(), 3);
        assert_eq!(backend.save_count(), 1);

        // Already seeded: no extra save.
        let (backend, _store) = milk_store(StockPolicy::default()).await;
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn test_commit_milk_scenario() {
        let (backend, store) = milk_store(StockPolicy::AllowNegative).await;

        let sale = store
            .commit(order(vec![SaleLineItem::new("p1", 3)], 750))
            .await
            .unwrap();

        assert_eq!(sale.total.cents(), 750);
        assert_eq!(sale.items.len(), 1);
        assert!(uuid::Uuid::parse_str(&sale.id).is_ok());
        assert_eq!(store.get_product("p1").await.unwrap().stock, 7);
        assert_eq!(store.sales().await, vec![sale.clone()]);
        assert_eq!(store.get_sale(&sale.id).await, Some(sale));

        let saved = backend.saved().await.unwrap();
        assert_eq!(saved.products[0].stock, 7);
        assert_eq!(saved.sales.len(), 1);
        assert_eq!(backend.save_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_order_does_not_save() {
        let (backend, store) = milk_store(StockPolicy::AllowNegative).await;
        let before = store.snapshot().await;

        let err = store.commit(order(vec![], 0)).await.unwrap_err();

        assert!(matches!(err, StoreError::Core(CoreError::EmptyOrder)));
        assert_eq!(store.snapshot().await, before);
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_unchanged() {
        let (backend, store) = milk_store(StockPolicy::AllowNegative).await;
        let before = store.snapshot().await;
        backend.set_fail_saves(true);

        let err = store
            .commit(order(vec![SaleLineItem::new("p1", 3)], 750))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));

        assert!(store
            .add_product(NewProduct {
                name: "Bread".to_string(),
                price: Money::from_cents(180),
                stock: 4,
                barcode: "222".to_string(),
            })
            .await
            .is_err());

        assert_eq!(store.snapshot().await, before);

        backend.set_fail_saves(false);
        store
            .commit(order(vec![SaleLineItem::new("p1", 3)], 750))
            .await
            .unwrap();
        assert_eq!(store.get_product("p1").await.unwrap().stock, 7);
    }

    #[tokio::test]
    async fn test_unknown_product_line_commits() {
        let (_backend, store) = milk_store(StockPolicy::Reject).await;

        let sale = store
            .commit(order(vec![SaleLineItem::new("ghost", 2)], 100))
            .await
            .unwrap();

        assert_eq!(sale.items[0].product_id, "ghost");
        assert_eq!(store.get_product("p1").await.unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_reject_policy_blocks_oversell() {
        let (backend, store) = milk_store(StockPolicy::Reject).await;

        let err = store
            .commit(order(vec![SaleLineItem::new("p1", 11)], 2750))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { .. })
        ));
        assert_eq!(store.get_product("p1").await.unwrap().stock, 10);
        assert!(store.sales().await.is_empty());
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn test_product_crud() {
        let (_backend, store) = milk_store(StockPolicy::default()).await;

        let bread = store
            .add_product(NewProduct {
                name: "Bread".to_string(),
                price: Money::from_cents(180),
                stock: 4,
                barcode: "222".to_string(),
            })
            .await
            .unwrap();
        assert!(uuid::Uuid::parse_str(&bread.id).is_ok());
        assert_eq!(store.find_by_barcode("222").await.unwrap().id, bread.id);
        assert_eq!(store.search_products("BRE").await.unwrap().len(), 1);

        let mut cheaper = bread.clone();
        cheaper.price = Money::from_cents(150);
        store.update_product(cheaper).await.unwrap();
        assert_eq!(store.get_product(&bread.id).await.unwrap().price.cents(), 150);

        store.delete_product(&bread.id).await.unwrap();
        assert_eq!(store.products().await, vec![milk()]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let (backend, store) = milk_store(StockPolicy::default()).await;

        let ghost = Product {
            id: "ghost".to_string(),
            ..milk()
        };
        let err = store.update_product(ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(ref e) if e.is_not_found()));

        let err = store.delete_product("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::ProductNotFound(_))));
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn test_reopen_reproduces_state() {
        let (backend, store) = milk_store(StockPolicy::default()).await;
        store
            .commit(order(vec![SaleLineItem::new("p1", 2)], 500))
            .await
            .unwrap();
        let before = store.snapshot().await;
        drop(store);

        let reopened = Store::open(backend, StockPolicy::default()).await.unwrap();
        assert_eq!(reopened.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_concurrent_commits_are_serialized() {
        let (backend, store) = milk_store(StockPolicy::AllowNegative).await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .commit(order(vec![SaleLineItem::new("p1", 1)], 250))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get_product("p1").await.unwrap().stock, 2);
        assert_eq!(store.sales().await.len(), 8);
        assert_eq!(backend.save_count(), 8);
    }

    #[tokio::test]
    async fn test_user_management_requires_admin() {
        let (_backend, store) = milk_store(StockPolicy::default()).await;

        let draft = NewUser {
            username: "cashier2".to_string(),
            role: Role::Cashier,
        };

        let err = store.add_user("manager1", draft.clone()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::PermissionDenied { .. })
        ));

        let err = store.add_user("nobody", draft.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::UserNotFound(_))));

        let user = store.add_user("admin", draft).await.unwrap();
        assert_eq!(store.users().await.len(), 4);

        store.delete_user("admin", &user.id).await.unwrap();
        assert!(store.user_by_username("cashier2").await.is_none());
    }

    #[tokio::test]
    async fn test_supplier_crud() {
        let (backend, store) = milk_store(StockPolicy::default()).await;

        let supplier = store
            .add_supplier(NewSupplier {
                name: "Fresh Farms".to_string(),
                contact: "+237 600 000 000".to_string(),
                email: "orders@freshfarms.cm".to_string(),
            })
            .await
            .unwrap();

        let mut renamed = supplier.clone();
        renamed.name = "Fresh Farms Ltd".to_string();
        store.update_supplier(renamed).await.unwrap();

        store.delete_supplier(&supplier.id).await.unwrap();
        assert_eq!(store.suppliers().await.len(), 2);
        assert_eq!(backend.save_count(), 3);
    }
}
