//! Reporting over completed orders.
//!
//! Thin consumer of the order entity: groups orders with status
//! `Completed` by client or by owning seller, sums totals, and sorts
//! descending. No formatting, no pagination.

use std::collections::HashMap;

use common::{ClientId, Money, SellerId};
use store::{Client, Store, User};

use crate::error::Result;

/// A client's completed-order revenue.
#[derive(Debug, Clone)]
pub struct TopClientEntry {
    pub client_id: ClientId,
    /// The client record, when it still resolves.
    pub client: Option<Client>,
    pub total: Money,
}

/// A seller's completed-order revenue.
#[derive(Debug, Clone)]
pub struct TopSellerEntry {
    pub seller_id: SellerId,
    /// The user record, when it still resolves.
    pub seller: Option<User>,
    pub total: Money,
}

/// Aggregates completed orders.
#[derive(Clone)]
pub struct Reports<S> {
    store: S,
}

impl<S: Store> Reports<S> {
    /// Creates a new report aggregator over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Clients ranked by summed completed-order totals, best first.
    #[tracing::instrument(skip(self))]
    pub async fn top_clients(&self) -> Result<Vec<TopClientEntry>> {
        let orders = self.store.list_completed_orders().await?;

        let mut totals: HashMap<ClientId, Money> = HashMap::new();
        for order in &orders {
            *totals.entry(order.client).or_default() += order.total;
        }

        let mut entries = Vec::with_capacity(totals.len());
        for (client_id, total) in totals {
            let client = self.store.get_client(client_id).await?;
            entries.push(TopClientEntry {
                client_id,
                client,
                total,
            });
        }
        entries.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(entries)
    }

    /// Sellers ranked by summed completed-order totals, best first.
    #[tracing::instrument(skip(self))]
    pub async fn top_sellers(&self) -> Result<Vec<TopSellerEntry>> {
        let orders = self.store.list_completed_orders().await?;

        let mut totals: HashMap<SellerId, Money> = HashMap::new();
        for order in &orders {
            *totals.entry(order.owner).or_default() += order.total;
        }

        let mut entries = Vec::with_capacity(totals.len());
        for (seller_id, total) in totals {
            let seller = self.store.get_user(seller_id).await?;
            entries.push(TopSellerEntry {
                seller_id,
                seller,
                total,
            });
        }
        entries.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(entries)
    }
}
