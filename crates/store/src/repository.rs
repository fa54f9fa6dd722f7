//! Repository traits implemented by the in-memory and PostgreSQL stores.

use async_trait::async_trait;
use common::{ClientId, OrderId, ProductId, SellerId};

use crate::model::{Client, Order, OrderStatus, Product, User};
use crate::Result;

/// Outcome of a conditional stock decrement.
///
/// The decrement is the linearization point for the non-negative-stock
/// invariant: implementations must guarantee that two concurrent decrements
/// against the same product never jointly exceed the available quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// The decrement was applied; `remaining` is the stock left afterwards.
    Applied { remaining: u32 },
    /// The requested quantity exceeds the available stock. Nothing was
    /// changed. `available` is informational and may be stale by the time
    /// the caller observes it.
    Insufficient { available: u32 },
    /// The product id does not resolve.
    ProductMissing,
}

/// Storage for salesperson accounts. Read-mostly; inserts exist for
/// seeding and so reports can resolve seller names.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `DuplicateKey` if the email is taken.
    async fn insert_user(&self, user: User) -> Result<()>;

    /// Looks up a user by id.
    async fn get_user(&self, id: SellerId) -> Result<Option<User>>;

    /// Looks up a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Storage for client records.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Inserts a client. Fails with `DuplicateKey` if the email is taken.
    async fn insert_client(&self, client: Client) -> Result<()>;

    /// Looks up a client by id.
    async fn get_client(&self, id: ClientId) -> Result<Option<Client>>;

    /// Replaces a client record by id.
    async fn update_client(&self, client: Client) -> Result<()>;

    /// Deletes a client by id.
    async fn delete_client(&self, id: ClientId) -> Result<()>;

    /// Lists the clients owned by a seller.
    async fn list_clients_for_owner(&self, owner: SellerId) -> Result<Vec<Client>>;
}

/// Storage for catalog products, including the atomic stock primitive.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts a product.
    async fn insert_product(&self, product: Product) -> Result<()>;

    /// Looks up a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>>;

    /// Replaces a product record by id.
    async fn update_product(&self, product: Product) -> Result<()>;

    /// Deletes a product by id.
    async fn delete_product(&self, id: ProductId) -> Result<()>;

    /// Lists all catalog products.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Atomically decrements a product's stock by `quantity` if at least
    /// that much is available.
    ///
    /// Implementations must make the read-then-write atomic per product:
    /// a conditional update in PostgreSQL, a check under the write lock in
    /// memory. Never leaves stock negative.
    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> Result<StockDecrement>;
}

/// Storage for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts an order.
    async fn insert_order(&self, order: Order) -> Result<()>;

    /// Looks up an order by id.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Replaces an order record by id.
    async fn update_order(&self, order: Order) -> Result<()>;

    /// Deletes an order by id.
    async fn delete_order(&self, id: OrderId) -> Result<()>;

    /// Lists the orders owned by a seller.
    async fn list_orders_for_owner(&self, owner: SellerId) -> Result<Vec<Order>>;

    /// Lists the orders owned by a seller with the given status.
    async fn list_orders_for_owner_with_status(
        &self,
        owner: SellerId,
        status: OrderStatus,
    ) -> Result<Vec<Order>>;

    /// Lists all completed orders, for reporting.
    async fn list_completed_orders(&self) -> Result<Vec<Order>>;
}

/// The full repository interface the back office runs against.
pub trait Store: UserStore + ClientStore + ProductStore + OrderStore {}

impl<T: UserStore + ClientStore + ProductStore + OrderStore> Store for T {}
