//! Order endpoints, ownership-scoped.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{ClientId, OrderId, ProductId, SellerId};
use domain::{LineItemRequest, OrderUpdate};
use serde::{Deserialize, Serialize};
use store::{Order, OrderStatus, Store};
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub client_id: Uuid,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub client_id: Option<Uuid>,
    pub items: Option<Vec<OrderItemRequest>>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub owner: SellerId,
    pub client_id: ClientId,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            owner: order.owner,
            client_id: order.client,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                })
                .collect(),
            total_cents: order.total.cents(),
            status: order.status.to_string(),
            created_at: order.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

fn parse_status(raw: &str) -> Result<OrderStatus, ApiError> {
    OrderStatus::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid order status: {raw}")))
}

fn to_line_items(items: Vec<OrderItemRequest>) -> Vec<LineItemRequest> {
    items
        .into_iter()
        .map(|item| LineItemRequest {
            product_id: ProductId::from_uuid(item.product_id),
            quantity: item.quantity,
        })
        .collect()
}

// -- Handlers --

/// POST /orders — create an order for a client owned by the caller.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order = state
        .engine
        .create_order(
            caller.seller(),
            ClientId::from_uuid(req.client_id),
            to_line_items(req.items),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders — list the caller's orders, optionally filtered by status.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = match query.status.as_deref() {
        Some(raw) => {
            let status = parse_status(raw)?;
            state
                .engine
                .list_orders_by_status(caller.seller(), status)
                .await?
        }
        None => state.engine.list_orders(caller.seller()).await?,
    };
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /orders/{id} — fetch one of the caller's orders.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .engine
        .get_order(caller.seller(), OrderId::from_uuid(id))
        .await?;
    Ok(Json(order.into()))
}

/// PUT /orders/{id} — update one of the caller's orders. New line items
/// are re-reserved against current stock.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let status = req.status.as_deref().map(parse_status).transpose()?;

    let order = state
        .engine
        .update_order(
            caller.seller(),
            OrderId::from_uuid(id),
            OrderUpdate {
                client: req.client_id.map(ClientId::from_uuid),
                items: req.items.map(to_line_items),
                status,
            },
        )
        .await?;
    Ok(Json(order.into()))
}

/// DELETE /orders/{id} — delete one of the caller's orders. Stock is
/// not restored.
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state
        .engine
        .delete_order(caller.seller(), OrderId::from_uuid(id))
        .await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
