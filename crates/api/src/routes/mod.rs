//! Route handlers.

pub mod clients;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod reports;

use domain::{Catalog, ClientDesk, OrderEngine, Reports};

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub engine: OrderEngine<S>,
    pub clients: ClientDesk<S>,
    pub catalog: Catalog<S>,
    pub reports: Reports<S>,
}
