use async_trait::async_trait;
use common::{ClientId, Money, OrderId, ProductId, SellerId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::model::{Client, LineItem, Order, OrderStatus, Product, User};
use crate::repository::{ClientStore, OrderStore, ProductStore, StockDecrement, UserStore};
use crate::{Result, StoreError};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        Ok(User {
            id: SellerId::from_uuid(row.try_get::<Uuid, _>("id")?),
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_client(row: PgRow) -> Result<Client> {
        Ok(Client {
            id: ClientId::from_uuid(row.try_get::<Uuid, _>("id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            company: row.try_get("company")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            owner: SellerId::from_uuid(row.try_get::<Uuid, _>("owner")?),
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            stock: row.try_get::<i64, _>("stock")? as u32,
            price: Money::from_cents(row.try_get("price_cents")?),
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items_json: serde_json::Value = row.try_get("items")?;
        let items: Vec<LineItem> = serde_json::from_value(items_json)?;
        let status_raw: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_raw).ok_or_else(|| {
            StoreError::Serialization(serde_json::Error::io(std::io::Error::other(format!(
                "unknown order status: {status_raw}"
            ))))
        })?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            owner: SellerId::from_uuid(row.try_get::<Uuid, _>("owner")?),
            client: ClientId::from_uuid(row.try_get::<Uuid, _>("client")?),
            items,
            total: Money::from_cents(row.try_get("total_cents")?),
            status,
            created_at: row.try_get("created_at")?,
        })
    }

    fn map_unique_violation(
        err: sqlx::Error,
        constraint: &str,
        entity: &'static str,
        key: &str,
    ) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.constraint() == Some(constraint)
        {
            return StoreError::DuplicateKey {
                entity,
                key: key.to_string(),
            };
        }
        StoreError::Database(err)
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, "users_email_key", "user", &user.email))?;

        Ok(())
    }

    async fn get_user(&self, id: SellerId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl ClientStore for PostgresStore {
    async fn insert_client(&self, client: Client) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (id, first_name, last_name, company, email, phone, owner, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.company)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.owner.as_uuid())
        .bind(client.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, "clients_email_key", "client", &client.email))?;

        Ok(())
    }

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT * FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_client).transpose()
    }

    async fn update_client(&self, client: Client) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET first_name = $2, last_name = $3, company = $4, email = $5, phone = $6
            WHERE id = $1
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.company)
        .bind(&client.email)
        .bind(&client.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, "clients_email_key", "client", &client.email))?;

        Ok(())
    }

    async fn delete_client(&self, id: ClientId) -> Result<()> {
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_clients_for_owner(&self, owner: SellerId) -> Result<Vec<Client>> {
        let rows = sqlx::query("SELECT * FROM clients WHERE owner = $1 ORDER BY created_at")
            .bind(owner.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_client).collect()
    }
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn insert_product(&self, product: Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, stock, price_cents, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.stock as i64)
        .bind(product.price.cents())
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn update_product(&self, product: Product) -> Result<()> {
        sqlx::query("UPDATE products SET name = $2, stock = $3, price_cents = $4 WHERE id = $1")
            .bind(product.id.as_uuid())
            .bind(&product.name)
            .bind(product.stock as i64)
            .bind(product.price.cents())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn decrement_stock(&self, id: ProductId, quantity: u32) -> Result<StockDecrement> {
        // The conditional update is the linearization point: the row lock
        // taken by UPDATE makes the stock comparison and the write a single
        // atomic step, so concurrent decrements can never jointly oversell.
        let row = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - $2
            WHERE id = $1 AND stock >= $2
            RETURNING stock
            "#,
        )
        .bind(id.as_uuid())
        .bind(quantity as i64)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let remaining: i64 = row.try_get("stock")?;
            return Ok(StockDecrement::Applied {
                remaining: remaining as u32,
            });
        }

        // Either the product is missing or the stock was short; a second
        // read tells the two apart. The available count is informational
        // and may already be stale.
        let row = sqlx::query("SELECT stock FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let available: i64 = row.try_get("stock")?;
                Ok(StockDecrement::Insufficient {
                    available: available as u32,
                })
            }
            None => Ok(StockDecrement::ProductMissing),
        }
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn insert_order(&self, order: Order) -> Result<()> {
        let items_json = serde_json::to_value(&order.items)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, owner, client, items, total_cents, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.owner.as_uuid())
        .bind(order.client.as_uuid())
        .bind(items_json)
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn update_order(&self, order: Order) -> Result<()> {
        let items_json = serde_json::to_value(&order.items)?;

        sqlx::query(
            r#"
            UPDATE orders
            SET client = $2, items = $3, total_cents = $4, status = $5
            WHERE id = $1
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.client.as_uuid())
        .bind(items_json)
        .bind(order.total.cents())
        .bind(order.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_orders_for_owner(&self, owner: SellerId) -> Result<Vec<Order>> {
        let rows = sqlx::query("SELECT * FROM orders WHERE owner = $1 ORDER BY created_at")
            .bind(owner.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_orders_for_owner_with_status(
        &self,
        owner: SellerId,
        status: OrderStatus,
    ) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT * FROM orders WHERE owner = $1 AND status = $2 ORDER BY created_at",
        )
        .bind(owner.as_uuid())
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_completed_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query("SELECT * FROM orders WHERE status = 'COMPLETED'")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}
