//! Persistent record types.

use chrono::{DateTime, Utc};
use common::{ClientId, Money, OrderId, ProductId, SellerId};
use serde::{Deserialize, Serialize};

/// A salesperson account.
///
/// Created out of band (registration is not part of this system); read-only
/// to the fulfillment engine. The password hash is opaque here — hashing and
/// verification belong to the upstream identity context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: SellerId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// A client record, owned by the seller who created it.
///
/// The owner is set once at creation and never reassigned; there is no
/// transfer-of-ownership operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub owner: SellerId,
    pub created_at: DateTime<Utc>,
}

/// A catalog product with its available (unreserved) stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
    pub price: Money,
    pub created_at: DateTime<Utc>,
}

/// A line item embedded in an order.
///
/// Captures the product name and unit price at reservation time so the
/// order total and error messages stay stable when the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineItem {
    /// Returns the total price for this item (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Order status, set externally; the engine records but does not
/// validate transitions. Reporting consumes `Completed` orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Returns the canonical string form used in the database and API.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parses the canonical string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "COMPLETED" => Some(OrderStatus::Completed),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: SellerId,
    pub client: ClientId,
    pub items: Vec<LineItem>,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_total_price() {
        let item = LineItem {
            product_id: ProductId::new(),
            product_name: "Widget".to_string(),
            quantity: 3,
            unit_price: Money::from_cents(1000),
        };
        assert_eq!(item.total_price().cents(), 3000);
    }

    #[test]
    fn order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("SHIPPED"), None);
    }

    #[test]
    fn order_status_serializes_screaming() {
        let json = serde_json::to_string(&OrderStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }

    #[test]
    fn order_serialization_roundtrip() {
        let order = Order {
            id: OrderId::new(),
            owner: SellerId::new(),
            client: ClientId::new(),
            items: vec![LineItem {
                product_id: ProductId::new(),
                product_name: "Widget".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(999),
            }],
            total: Money::from_cents(1998),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
