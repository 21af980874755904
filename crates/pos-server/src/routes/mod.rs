//! HTTP route handlers for the POS catalog.
//!
//! Every route is wrapped by the error interceptor middleware, so handlers
//! only ever return an [`ApiError`] and never shape error bodies themselves.

pub mod health;
pub mod products;

use std::sync::Arc;

use axum::extract::OriginalUri;
use axum::http::Method;
use axum::middleware as axum_mw;
use axum::Router;

use crate::error::{ApiError, HttpError};
use crate::middleware::intercept_errors;
use crate::state::AppState;

/// Build the application router.
///
/// ```text
/// /products        POST, GET
/// /products/{id}   GET, PATCH, DELETE
/// /health          GET
/// ```
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/products", products::router())
        .merge(health::router())
        .fallback(unmatched)
        .method_not_allowed_fallback(unmatched)
        .layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            intercept_errors,
        ))
        .with_state(state)
}

/// Unknown path, or a known path without a handler for the method.
async fn unmatched(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    HttpError::not_found(format!("Cannot {method} {}", uri.path())).into()
}
