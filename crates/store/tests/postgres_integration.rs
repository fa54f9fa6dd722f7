//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::Utc;
use common::{ClientId, Money, ProductId, SellerId};
use sqlx::PgPool;
use store::{
    Client, ClientStore, PostgresStore, Product, ProductStore, StockDecrement, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            // Run migrations using raw_sql to execute multiple statements
            sqlx::raw_sql(include_str!("../../../migrations/001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_store() -> PostgresStore {
    let info = get_container_info().await;
    let pool = PgPool::connect(&info.connection_string).await.unwrap();
    PostgresStore::new(pool)
}

fn product(stock: u32, cents: i64) -> Product {
    Product {
        id: ProductId::new(),
        name: "Widget".to_string(),
        stock,
        price: Money::from_cents(cents),
        created_at: Utc::now(),
    }
}

fn client(owner: SellerId, email: &str) -> Client {
    Client {
        id: ClientId::new(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        company: "Analytical Engines".to_string(),
        email: email.to_string(),
        phone: None,
        owner,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn product_roundtrip_and_conditional_decrement() {
    let store = get_store().await;
    let p = product(5, 1000);
    let id = p.id;
    store.insert_product(p.clone()).await.unwrap();

    let fetched = store.get_product(id).await.unwrap().unwrap();
    assert_eq!(fetched.stock, 5);
    assert_eq!(fetched.price, Money::from_cents(1000));

    let outcome = store.decrement_stock(id, 3).await.unwrap();
    assert_eq!(outcome, StockDecrement::Applied { remaining: 2 });

    let outcome = store.decrement_stock(id, 3).await.unwrap();
    assert_eq!(outcome, StockDecrement::Insufficient { available: 2 });

    assert_eq!(store.get_product(id).await.unwrap().unwrap().stock, 2);
}

#[tokio::test]
async fn decrement_missing_product() {
    let store = get_store().await;
    let outcome = store.decrement_stock(ProductId::new(), 1).await.unwrap();
    assert_eq!(outcome, StockDecrement::ProductMissing);
}

#[tokio::test]
async fn concurrent_decrements_never_oversell() {
    let store = get_store().await;
    let p = product(10, 1000);
    let id = p.id;
    store.insert_product(p).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(
            async move { store.decrement_stock(id, 1).await },
        ));
    }

    let mut applied = 0;
    for handle in handles {
        if let StockDecrement::Applied { .. } = handle.await.unwrap().unwrap() {
            applied += 1;
        }
    }

    assert_eq!(applied, 10);
    assert_eq!(store.get_product(id).await.unwrap().unwrap().stock, 0);
}

#[tokio::test]
async fn duplicate_client_email_maps_to_duplicate_key() {
    let store = get_store().await;
    let owner = SellerId::new();

    store
        .insert_client(client(owner, "pg-dup@example.com"))
        .await
        .unwrap();

    let err = store
        .insert_client(client(owner, "pg-dup@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateKey { entity: "client", .. }
    ));
}

#[tokio::test]
async fn client_listing_is_owner_scoped() {
    let store = get_store().await;
    let alice = SellerId::new();
    let bob = SellerId::new();

    store
        .insert_client(client(alice, "pg-alice@example.com"))
        .await
        .unwrap();
    store
        .insert_client(client(bob, "pg-bob@example.com"))
        .await
        .unwrap();

    let listed = store.list_clients_for_owner(alice).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].owner, alice);
}
