//! Domain error taxonomy.
//!
//! All variants are terminal: nothing here is retried internally, and every
//! failure is reported to the caller verbatim.

use common::ProductId;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An id resolved to nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Ownership mismatch or missing caller identity.
    #[error("caller does not have the credentials for this resource")]
    Forbidden,

    /// A line item quantity exceeds the product's available stock.
    /// Non-retriable without caller intervention: reduce the quantity or
    /// pick another product.
    #[error(
        "product {product_name} exceeds the available quantity: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// A unique key is already taken on creation.
    #[error("{entity} already registered: {key}")]
    AlreadyExists { entity: &'static str, key: String },

    /// A line item quantity must be a positive integer.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// A product price must be non-negative.
    #[error("invalid price: {cents} cents")]
    InvalidPrice { cents: i64 },

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DomainError {
    /// Builds a `NotFound` for the given entity and id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { entity, key } => DomainError::AlreadyExists { entity, key },
            other => DomainError::Store(other),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_maps_to_already_exists() {
        let err: DomainError = StoreError::DuplicateKey {
            entity: "client",
            key: "ada@example.com".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            DomainError::AlreadyExists { entity: "client", .. }
        ));
    }

    #[test]
    fn insufficient_stock_names_the_product() {
        let err = DomainError::InsufficientStock {
            product_id: ProductId::new(),
            product_name: "Widget".to_string(),
            requested: 5,
            available: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("Widget"));
        assert!(msg.contains("requested 5"));
        assert!(msg.contains("available 2"));
    }
}
