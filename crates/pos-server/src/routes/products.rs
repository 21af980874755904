//! Product routes: `/products/*`
//!
//! Each handler is a single call into the [`ProductStore`](pos_storage::ProductStore).
//! Constraint failures surface as `StorageError`s and are answered by the
//! storage error translator.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use pos_storage::{NewProduct, Product, ProductPatch};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// Build the `/products` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create).get(find_all))
        .route("/{id}", get(find_one).patch(update).delete(remove))
}

/// `POST /products` — create a product.
async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.store.create(body).await?;
    tracing::info!(id = product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products` — list all products.
async fn find_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.store.find_all().await?))
}

/// `GET /products/{id}` — fetch one product, `null` when there is none.
async fn find_one(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Option<Product>>, ApiError> {
    Ok(Json(state.store.find_one(id).await?))
}

/// `PATCH /products/{id}` — partial update.
async fn update(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.store.update(id, patch).await?))
}

/// `DELETE /products/{id}` — delete and return the removed product.
async fn remove(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Product>, ApiError> {
    let product = state.store.remove(id).await?;
    tracing::info!(id = product.id, "product removed");
    Ok(Json(product))
}
