//! Durable storage for the sales back office.
//!
//! This crate provides:
//! - Persistent record types (users, clients, products, orders)
//! - The `Store` trait family describing the repository interface
//! - An in-memory implementation for tests and local development
//! - A PostgreSQL implementation backed by sqlx
//!
//! The one concurrency-critical primitive is [`ProductStore::decrement_stock`]:
//! a conditional decrement that either applies atomically or reports the
//! available quantity, so product stock can never go negative under
//! concurrent reservations.

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use model::{Client, LineItem, Order, OrderStatus, Product, User};
pub use postgres::PostgresStore;
pub use repository::{ClientStore, OrderStore, ProductStore, StockDecrement, Store, UserStore};
