//! Shared types used across the back-office crates.

pub mod types;

pub use types::{ClientId, Money, OrderId, ProductId, SellerId};
