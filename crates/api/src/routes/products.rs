//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use domain::{NewProduct, ProductUpdate};
use serde::{Deserialize, Serialize};
use store::{Product, Store};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub stock: u32,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub stock: Option<u32>,
    pub price_cents: Option<i64>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub stock: u32,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            stock: product.stock,
            price_cents: product.price.cents(),
            created_at: product.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

// -- Handlers --

/// POST /products — add a product to the catalog.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state
        .catalog
        .create_product(NewProduct {
            name: req.name,
            stock: req.stock,
            price: Money::from_cents(req.price_cents),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /products — list the catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/{id} — fetch a product.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.catalog.get_product(ProductId::from_uuid(id)).await?;
    Ok(Json(product.into()))
}

/// PUT /products/{id} — update a product.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .catalog
        .update_product(
            ProductId::from_uuid(id),
            ProductUpdate {
                name: req.name,
                stock: req.stock,
                price: req.price_cents.map(Money::from_cents),
            },
        )
        .await?;
    Ok(Json(product.into()))
}

/// DELETE /products/{id} — remove a product from the catalog.
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state
        .catalog
        .delete_product(ProductId::from_uuid(id))
        .await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
