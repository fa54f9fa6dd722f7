//! The stock ledger.
//!
//! Owns the invariant that a product's available quantity reflects all
//! committed reservations. The actual linearization lives in the store's
//! conditional decrement; this layer resolves the product, validates the
//! quantity, and turns store outcomes into the domain taxonomy.

use common::{Money, ProductId};
use store::{ProductStore, StockDecrement};

use crate::error::{DomainError, Result};

/// A successful reservation: stock was decremented and committed.
///
/// Captures the product name and unit price at reservation time; the
/// fulfillment engine derives line items and order totals from these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl Reservation {
    /// Returns the total price of the reserved quantity.
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Reserves product stock against a store.
///
/// There is no release operation: an order update re-reserves its supplied
/// line items against current stock without restoring the previous
/// reservation, and deleting an order does not restore stock. That
/// accounting matches the system this one replaces; downstream consumers
/// depend on it.
#[derive(Clone)]
pub struct StockLedger<S> {
    store: S,
}

impl<S: ProductStore> StockLedger<S> {
    /// Creates a new ledger over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reserves `quantity` units of a product.
    ///
    /// Fails with `NotFound` if the product does not resolve, and with
    /// `InsufficientStock` (naming the product) if the quantity exceeds
    /// what is available. On success the decrement is already durable.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(&self, product_id: ProductId, quantity: u32) -> Result<Reservation> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity {
                product_id,
                quantity,
            });
        }

        // Read first for the name and the price at reservation time. The
        // decrement below is the atomic gate; this read never decides it.
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| DomainError::not_found("product", product_id))?;

        match self.store.decrement_stock(product_id, quantity).await? {
            StockDecrement::Applied { remaining } => {
                metrics::counter!("stock_reservations_total").increment(1);
                tracing::debug!(%product_id, quantity, remaining, "stock reserved");
                Ok(Reservation {
                    product_id,
                    product_name: product.name,
                    quantity,
                    unit_price: product.price,
                })
            }
            StockDecrement::Insufficient { available } => {
                metrics::counter!("stock_reservation_failures_total").increment(1);
                Err(DomainError::InsufficientStock {
                    product_id,
                    product_name: product.name,
                    requested: quantity,
                    available,
                })
            }
            // Deleted between the read above and the decrement.
            StockDecrement::ProductMissing => {
                Err(DomainError::not_found("product", product_id))
            }
        }
    }
}
