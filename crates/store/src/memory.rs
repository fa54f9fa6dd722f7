use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{ClientId, OrderId, ProductId, SellerId};
use tokio::sync::RwLock;

use crate::model::{Client, Order, OrderStatus, Product, User};
use crate::repository::{ClientStore, OrderStore, ProductStore, StockDecrement, UserStore};
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct State {
    users: HashMap<SellerId, User>,
    clients: HashMap<ClientId, Client>,
    products: HashMap<ProductId, Product>,
    orders: HashMap<OrderId, Order>,
}

/// In-memory store for tests and local development.
///
/// Provides the same interface as the PostgreSQL implementation. All
/// mutations take the single write lock, so check-and-mutate sequences
/// (unique email on insert, the stock decrement) are linearized the same
/// way the database constraints linearize them.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the number of stored clients.
    pub async fn client_count(&self) -> usize {
        self.state.read().await.clients.len()
    }

    /// Clears all stored records.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.users.clear();
        state.clients.clear();
        state.products.clear();
        state.orders.clear();
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey {
                entity: "user",
                key: user.email,
            });
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    async fn get_user(&self, id: SellerId) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ClientStore for InMemoryStore {
    async fn insert_client(&self, client: Client) -> Result<()> {
        let mut state = self.state.write().await;
        if state.clients.values().any(|c| c.email == client.email) {
            return Err(StoreError::DuplicateKey {
                entity: "client",
                key: client.email,
            });
        }
        state.clients.insert(client.id, client);
        Ok(())
    }

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>> {
        Ok(self.state.read().await.clients.get(&id).cloned())
    }

    async fn update_client(&self, client: Client) -> Result<()> {
        let mut state = self.state.write().await;
        if state
            .clients
            .values()
            .any(|c| c.id != client.id && c.email == client.email)
        {
            return Err(StoreError::DuplicateKey {
                entity: "client",
                key: client.email,
            });
        }
        state.clients.insert(client.id, client);
        Ok(())
    }

    async fn delete_client(&self, id: ClientId) -> Result<()> {
        let mut state = self.state.write().await;
        state.clients.remove(&id);
        Ok(())
    }

    async fn list_clients_for_owner(&self, owner: SellerId) -> Result<Vec<Client>> {
        let state = self.state.read().await;
        let mut clients: Vec<_> = state
            .clients
            .values()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect();
        clients.sort_by_key(|c| c.created_at);
        Ok(clients)
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn insert_product(&self, product: Product) -> Result<()> {
        let mut state = self.state.write().await;
        state.products.insert(product.id, product);
        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn update_product(&self, product: Product) -> Result<()> {
        let mut state = self.state.write().await;
        state.products.insert(product.id, product);
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let mut state = self.state.write().await;
        state.products.remove(&id);
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<_> = state.products.values().cloned().collect();
        products.sort_by_key(|p| p.created_at);
        Ok(products)
    }

    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> Result<StockDecrement> {
        let mut state = self.state.write().await;
        let Some(product) = state.products.get_mut(&id) else {
            return Ok(StockDecrement::ProductMissing);
        };
        if quantity > product.stock {
            return Ok(StockDecrement::Insufficient {
                available: product.stock,
            });
        }
        product.stock -= quantity;
        Ok(StockDecrement::Applied {
            remaining: product.stock,
        })
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: Order) -> Result<()> {
        let mut state = self.state.write().await;
        state.orders.insert(order.id, order);
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn update_order(&self, order: Order) -> Result<()> {
        let mut state = self.state.write().await;
        state.orders.insert(order.id, order);
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut state = self.state.write().await;
        state.orders.remove(&id);
        Ok(())
    }

    async fn list_orders_for_owner(&self, owner: SellerId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.owner == owner)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn list_orders_for_owner_with_status(
        &self,
        owner: SellerId,
        status: OrderStatus,
    ) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.owner == owner && o.status == status)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn list_completed_orders(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Completed)
            .cloned()
            .collect())
    }
}
