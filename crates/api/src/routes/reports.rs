//! Reporting endpoints over completed orders.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::{ClientId, SellerId};
use serde::Serialize;
use store::Store;

use crate::error::ApiError;
use crate::routes::AppState;
use crate::routes::clients::ClientResponse;

#[derive(Serialize)]
pub struct TopClientResponse {
    pub client_id: ClientId,
    pub client: Option<ClientResponse>,
    pub total_cents: i64,
}

/// Seller summary for reports; deliberately excludes the password hash.
#[derive(Serialize)]
pub struct SellerResponse {
    pub id: SellerId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize)]
pub struct TopSellerResponse {
    pub seller_id: SellerId,
    pub seller: Option<SellerResponse>,
    pub total_cents: i64,
}

/// GET /reports/top-clients — clients ranked by completed-order revenue.
#[tracing::instrument(skip(state))]
pub async fn top_clients<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<TopClientResponse>>, ApiError> {
    let entries = state.reports.top_clients().await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|entry| TopClientResponse {
                client_id: entry.client_id,
                client: entry.client.map(Into::into),
                total_cents: entry.total.cents(),
            })
            .collect(),
    ))
}

/// GET /reports/top-sellers — sellers ranked by completed-order revenue.
#[tracing::instrument(skip(state))]
pub async fn top_sellers<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<TopSellerResponse>>, ApiError> {
    let entries = state.reports.top_sellers().await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|entry| TopSellerResponse {
                seller_id: entry.seller_id,
                seller: entry.seller.map(|user| SellerResponse {
                    id: user.id,
                    email: user.email,
                    first_name: user.first_name,
                    last_name: user.last_name,
                }),
                total_cents: entry.total.cents(),
            })
            .collect(),
    ))
}
