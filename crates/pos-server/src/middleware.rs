//! Error interception middleware.
//!
//! Runs the request, then looks for a [`CaughtError`] left in the response
//! extensions by an [`ApiError`](crate::error::ApiError). If one is there, the
//! response is replaced by whatever the state's [`InterceptorChain`]
//! produces for it.
//!
//! [`InterceptorChain`]: crate::interceptor::InterceptorChain

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::interceptor::{CaughtError, RequestContext};
use crate::state::AppState;

/// Middleware that routes handler errors through the interceptor chain.
pub async fn intercept_errors(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext {
        method: req.method().clone(),
        path: req.uri().path().to_owned(),
    };

    let mut response = next.run(req).await;

    match response.extensions_mut().remove::<CaughtError>() {
        Some(error) => state.interceptors.dispatch(error, &ctx),
        None => response,
    }
}
