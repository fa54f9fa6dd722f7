//! The order fulfillment engine.
//!
//! Orchestrates the ownership guard and the stock ledger: an order is only
//! created for a client the caller owns, every line item is reserved against
//! current stock in request order, and the total is derived from the prices
//! captured at reservation time.

use chrono::Utc;
use common::{ClientId, Money, OrderId, ProductId, SellerId};
use store::{LineItem, Order, OrderStatus, Store};

use crate::access;
use crate::error::{DomainError, Result};
use crate::stock::StockLedger;

/// A requested line item, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Fields of an order that an update may replace.
///
/// `status` is recorded as supplied; the engine does not validate status
/// transitions (statuses are set externally and consumed by reporting).
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub client: Option<ClientId>,
    pub items: Option<Vec<LineItemRequest>>,
    pub status: Option<OrderStatus>,
}

/// Creates, mutates, and reads orders on behalf of an authenticated seller.
#[derive(Clone)]
pub struct OrderEngine<S> {
    store: S,
    ledger: StockLedger<S>,
}

impl<S: Store + Clone> OrderEngine<S> {
    /// Creates a new engine over the given store.
    pub fn new(store: S) -> Self {
        let ledger = StockLedger::new(store.clone());
        Self { store, ledger }
    }

    /// Creates an order for a client owned by the caller.
    ///
    /// Line items are reserved in the caller-supplied order; the first
    /// failure aborts the whole operation. Reservations already applied in
    /// the same call stay decremented — the ledger has no release
    /// operation, and that accounting is relied on downstream.
    #[tracing::instrument(skip(self, items))]
    pub async fn create_order(
        &self,
        caller: Option<SellerId>,
        client_id: ClientId,
        items: Vec<LineItemRequest>,
    ) -> Result<Order> {
        let client = self
            .store
            .get_client(client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("client", client_id))?;
        access::require_owner(client.owner, caller)?;

        let line_items = self.reserve_all(&items).await?;
        let total = Self::total_of(&line_items);

        let order = Order {
            id: OrderId::new(),
            owner: client.owner,
            client: client.id,
            items: line_items,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        self.store.insert_order(order.clone()).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, total = %order.total, "order created");
        Ok(order)
    }

    /// Updates an order owned by the caller.
    ///
    /// The effective client (supplied or existing) is re-validated exactly
    /// as at creation. If new line items are supplied they are re-reserved
    /// against current stock — the previous reservation is not restored
    /// first — and the total is recomputed from the new reservations.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_order(
        &self,
        caller: Option<SellerId>,
        order_id: OrderId,
        update: OrderUpdate,
    ) -> Result<Order> {
        let mut order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        access::require_owner(order.owner, caller)?;

        let client_id = update.client.unwrap_or(order.client);
        let client = self
            .store
            .get_client(client_id)
            .await?
            .ok_or_else(|| DomainError::not_found("client", client_id))?;
        access::require_owner(client.owner, caller)?;

        if let Some(items) = update.items {
            let line_items = self.reserve_all(&items).await?;
            order.total = Self::total_of(&line_items);
            order.items = line_items;
        }
        order.client = client.id;
        if let Some(status) = update.status {
            order.status = status;
        }

        self.store.update_order(order.clone()).await?;

        metrics::counter!("orders_updated_total").increment(1);
        Ok(order)
    }

    /// Deletes an order owned by the caller. Stock is not restored.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, caller: Option<SellerId>, order_id: OrderId) -> Result<()> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        access::require_owner(order.owner, caller)?;

        self.store.delete_order(order_id).await?;

        metrics::counter!("orders_deleted_total").increment(1);
        Ok(())
    }

    /// Returns an order, only to its owner.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, caller: Option<SellerId>, order_id: OrderId) -> Result<Order> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        access::require_owner(order.owner, caller)?;
        Ok(order)
    }

    /// Lists the caller's orders.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self, caller: Option<SellerId>) -> Result<Vec<Order>> {
        let seller = caller.ok_or(DomainError::Forbidden)?;
        Ok(self.store.list_orders_for_owner(seller).await?)
    }

    /// Lists the caller's orders with the given status.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_by_status(
        &self,
        caller: Option<SellerId>,
        status: OrderStatus,
    ) -> Result<Vec<Order>> {
        let seller = caller.ok_or(DomainError::Forbidden)?;
        Ok(self
            .store
            .list_orders_for_owner_with_status(seller, status)
            .await?)
    }

    /// Reserves every requested item in request order, short-circuiting on
    /// the first failure. The order of validation is observable: the first
    /// product that comes up short is the one named in the error.
    async fn reserve_all(&self, items: &[LineItemRequest]) -> Result<Vec<LineItem>> {
        let mut reserved = Vec::with_capacity(items.len());
        for item in items {
            let r = self.ledger.reserve(item.product_id, item.quantity).await?;
            reserved.push(LineItem {
                product_id: r.product_id,
                product_name: r.product_name,
                quantity: r.quantity,
                unit_price: r.unit_price,
            });
        }
        Ok(reserved)
    }

    fn total_of(items: &[LineItem]) -> Money {
        items.iter().map(LineItem::total_price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use store::{Client, ClientStore, InMemoryStore, Product, ProductStore};

    struct Fixture {
        store: InMemoryStore,
        engine: OrderEngine<InMemoryStore>,
        seller: SellerId,
        client_id: ClientId,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let seller = SellerId::new();
        let client = Client {
            id: ClientId::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            company: "Analytical Engines".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            owner: seller,
            created_at: Utc::now(),
        };
        let client_id = client.id;
        store.insert_client(client).await.unwrap();

        Fixture {
            engine: OrderEngine::new(store.clone()),
            store,
            seller,
            client_id,
        }
    }

    async fn seed_product(store: &InMemoryStore, name: &str, stock: u32, cents: i64) -> ProductId {
        let product = Product {
            id: ProductId::new(),
            name: name.to_string(),
            stock,
            price: Money::from_cents(cents),
            created_at: Utc::now(),
        };
        let id = product.id;
        store.insert_product(product).await.unwrap();
        id
    }

    #[tokio::test]
    async fn create_order_reserves_and_totals() {
        let fx = fixture().await;
        let a = seed_product(&fx.store, "Widget", 5, 1000).await;
        let b = seed_product(&fx.store, "Gadget", 3, 2500).await;

        let order = fx
            .engine
            .create_order(
                Some(fx.seller),
                fx.client_id,
                vec![
                    LineItemRequest {
                        product_id: a,
                        quantity: 2,
                    },
                    LineItemRequest {
                        product_id: b,
                        quantity: 1,
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(order.owner, fx.seller);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Money::from_cents(2 * 1000 + 2500));
        assert_eq!(fx.store.get_product(a).await.unwrap().unwrap().stock, 3);
        assert_eq!(fx.store.get_product(b).await.unwrap().unwrap().stock, 2);
    }

    #[tokio::test]
    async fn create_order_for_foreign_client_is_forbidden() {
        let fx = fixture().await;
        let a = seed_product(&fx.store, "Widget", 5, 1000).await;
        let stranger = SellerId::new();

        let err = fx
            .engine
            .create_order(
                Some(stranger),
                fx.client_id,
                vec![LineItemRequest {
                    product_id: a,
                    quantity: 1,
                }],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Forbidden));
        // No order was created and no stock was touched.
        assert_eq!(fx.store.order_count().await, 0);
        assert_eq!(fx.store.get_product(a).await.unwrap().unwrap().stock, 5);
    }

    #[tokio::test]
    async fn create_order_unknown_client_is_not_found() {
        let fx = fixture().await;
        let err = fx
            .engine
            .create_order(Some(fx.seller), ClientId::new(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "client", .. }));
    }

    #[tokio::test]
    async fn partial_failure_leaves_earlier_reservations_in_place() {
        let fx = fixture().await;
        let a = seed_product(&fx.store, "Widget", 5, 1000).await;
        let b = seed_product(&fx.store, "Gadget", 1, 2500).await;

        let err = fx
            .engine
            .create_order(
                Some(fx.seller),
                fx.client_id,
                vec![
                    LineItemRequest {
                        product_id: a,
                        quantity: 2,
                    },
                    LineItemRequest {
                        product_id: b,
                        quantity: 4,
                    },
                ],
            )
            .await
            .unwrap_err();

        match err {
            DomainError::InsufficientStock { product_name, .. } => {
                assert_eq!(product_name, "Gadget")
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // No order, but the first item's decrement stays (no compensation).
        assert_eq!(fx.store.order_count().await, 0);
        assert_eq!(fx.store.get_product(a).await.unwrap().unwrap().stock, 3);
        assert_eq!(fx.store.get_product(b).await.unwrap().unwrap().stock, 1);
    }

    #[tokio::test]
    async fn update_order_re_reserves_without_restoring() {
        let fx = fixture().await;
        let a = seed_product(&fx.store, "Widget", 10, 1000).await;

        let order = fx
            .engine
            .create_order(
                Some(fx.seller),
                fx.client_id,
                vec![LineItemRequest {
                    product_id: a,
                    quantity: 2,
                }],
            )
            .await
            .unwrap();
        assert_eq!(fx.store.get_product(a).await.unwrap().unwrap().stock, 8);

        let updated = fx
            .engine
            .update_order(
                Some(fx.seller),
                order.id,
                OrderUpdate {
                    items: Some(vec![LineItemRequest {
                        product_id: a,
                        quantity: 3,
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The old 2-unit reservation is not released before the new one.
        assert_eq!(fx.store.get_product(a).await.unwrap().unwrap().stock, 5);
        assert_eq!(updated.total, Money::from_cents(3000));
        assert_eq!(updated.items.len(), 1);
    }

    #[tokio::test]
    async fn update_order_sets_external_status() {
        let fx = fixture().await;
        let order = fx
            .engine
            .create_order(Some(fx.seller), fx.client_id, vec![])
            .await
            .unwrap();

        let updated = fx
            .engine
            .update_order(
                Some(fx.seller),
                order.id,
                OrderUpdate {
                    status: Some(OrderStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn foreign_update_and_delete_are_forbidden() {
        let fx = fixture().await;
        let order = fx
            .engine
            .create_order(Some(fx.seller), fx.client_id, vec![])
            .await
            .unwrap();
        let stranger = SellerId::new();

        let err = fx
            .engine
            .update_order(Some(stranger), order.id, OrderUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let err = fx
            .engine
            .delete_order(Some(stranger), order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        assert_eq!(fx.store.order_count().await, 1);
    }

    #[tokio::test]
    async fn delete_does_not_restore_stock() {
        let fx = fixture().await;
        let a = seed_product(&fx.store, "Widget", 5, 1000).await;

        let order = fx
            .engine
            .create_order(
                Some(fx.seller),
                fx.client_id,
                vec![LineItemRequest {
                    product_id: a,
                    quantity: 2,
                }],
            )
            .await
            .unwrap();

        fx.engine
            .delete_order(Some(fx.seller), order.id)
            .await
            .unwrap();

        assert_eq!(fx.store.order_count().await, 0);
        assert_eq!(fx.store.get_product(a).await.unwrap().unwrap().stock, 3);
    }

    #[tokio::test]
    async fn get_and_list_are_owner_scoped() {
        let fx = fixture().await;
        let order = fx
            .engine
            .create_order(Some(fx.seller), fx.client_id, vec![])
            .await
            .unwrap();

        let fetched = fx
            .engine
            .get_order(Some(fx.seller), order.id)
            .await
            .unwrap();
        assert_eq!(fetched.id, order.id);

        let err = fx
            .engine
            .get_order(Some(SellerId::new()), order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let listed = fx.engine.list_orders(Some(fx.seller)).await.unwrap();
        assert_eq!(listed.len(), 1);

        let err = fx.engine.list_orders(None).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn list_orders_by_status_filters() {
        let fx = fixture().await;
        let pending = fx
            .engine
            .create_order(Some(fx.seller), fx.client_id, vec![])
            .await
            .unwrap();
        let done = fx
            .engine
            .create_order(Some(fx.seller), fx.client_id, vec![])
            .await
            .unwrap();
        fx.engine
            .update_order(
                Some(fx.seller),
                done.id,
                OrderUpdate {
                    status: Some(OrderStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let completed = fx
            .engine
            .list_orders_by_status(Some(fx.seller), OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, done.id);

        let still_pending = fx
            .engine
            .list_orders_by_status(Some(fx.seller), OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(still_pending.len(), 1);
        assert_eq!(still_pending[0].id, pending.id);
    }
}
