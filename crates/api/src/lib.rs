//! HTTP API server for the sales back office.
//!
//! Translates transport concerns into engine calls: the caller identity is
//! extracted from the Authorization header, typed domain outcomes map to
//! HTTP statuses, and structured logging (tracing) plus Prometheus metrics
//! cover every route.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use domain::{Catalog, ClientDesk, OrderEngine, Reports};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the application state over the given store.
pub fn create_state<S: Store + Clone>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        engine: OrderEngine::new(store.clone()),
        clients: ClientDesk::new(store.clone()),
        catalog: Catalog::new(store.clone()),
        reports: Reports::new(store),
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/clients", post(routes::clients::create::<S>))
        .route("/clients", get(routes::clients::list::<S>))
        .route("/clients/{id}", get(routes::clients::get::<S>))
        .route("/clients/{id}", put(routes::clients::update::<S>))
        .route("/clients/{id}", delete(routes::clients::delete::<S>))
        .route("/products", post(routes::products::create::<S>))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/products/{id}", put(routes::products::update::<S>))
        .route("/products/{id}", delete(routes::products::delete::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}", put(routes::orders::update::<S>))
        .route("/orders/{id}", delete(routes::orders::delete::<S>))
        .route("/reports/top-clients", get(routes::reports::top_clients::<S>))
        .route("/reports/top-sellers", get(routes::reports::top_sellers::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
