//! Domain layer for the sales back office.
//!
//! This crate provides:
//! - The ownership guard, the single authorization predicate
//! - The stock ledger, which reserves product stock atomically
//! - The order fulfillment engine orchestrating both
//! - Client, catalog, and reporting services

pub mod access;
pub mod catalog;
pub mod clients;
pub mod error;
pub mod orders;
pub mod reports;
pub mod stock;

pub use access::{check_owner, require_owner, Access};
pub use catalog::{Catalog, NewProduct, ProductUpdate};
pub use clients::{ClientDesk, ClientUpdate, NewClient};
pub use error::DomainError;
pub use orders::{LineItemRequest, OrderEngine, OrderUpdate};
pub use reports::{Reports, TopClientEntry, TopSellerEntry};
pub use stock::{Reservation, StockLedger};
