//! Client CRUD endpoints, ownership-scoped.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{ClientId, SellerId};
use domain::{ClientUpdate, NewClient};
use serde::{Deserialize, Serialize};
use store::{Client, Store};
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateClientRequest {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateClientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    /// Absent field leaves the phone untouched; an explicit `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// -- Response types --

#[derive(Serialize)]
pub struct ClientResponse {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub owner: SellerId,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
            company: client.company,
            email: client.email,
            phone: client.phone,
            owner: client.owner,
            created_at: client.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

// -- Handlers --

/// POST /clients — register a client owned by the caller.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Json(req): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    let client = state
        .clients
        .create_client(
            caller.seller(),
            NewClient {
                first_name: req.first_name,
                last_name: req.last_name,
                company: req.company,
                email: req.email,
                phone: req.phone,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

/// GET /clients — list the caller's clients.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let clients = state.clients.list_clients(caller.seller()).await?;
    Ok(Json(clients.into_iter().map(Into::into).collect()))
}

/// GET /clients/{id} — fetch one of the caller's clients.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = state
        .clients
        .get_client(caller.seller(), ClientId::from_uuid(id))
        .await?;
    Ok(Json(client.into()))
}

/// PUT /clients/{id} — update one of the caller's clients.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = state
        .clients
        .update_client(
            caller.seller(),
            ClientId::from_uuid(id),
            ClientUpdate {
                first_name: req.first_name,
                last_name: req.last_name,
                company: req.company,
                email: req.email,
                phone: req.phone,
            },
        )
        .await?;
    Ok(Json(client.into()))
}

/// DELETE /clients/{id} — delete one of the caller's clients.
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state
        .clients
        .delete_client(caller.seller(), ClientId::from_uuid(id))
        .await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
