//! Default error interceptor.
//!
//! Errors that already carry a status ([`HttpError`]) are echoed as-is.
//! Anything else is an unexpected server fault: it is logged with the request
//! it came from and the client gets a bare 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pos_storage::StorageError;

use crate::error::{ApiErrorResponse, HttpError};
use crate::interceptor::{CaughtError, ErrorInterceptor, RequestContext};

/// Message sent with every unclassified 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Catch-all interceptor. Matches every error.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericErrorHandler;

impl ErrorInterceptor for GenericErrorHandler {
    fn matches(&self, _error: &CaughtError) -> bool {
        true
    }

    fn intercept(&self, error: CaughtError, ctx: &RequestContext) -> Response {
        if let Some(http) = error.downcast_ref::<HttpError>() {
            return ApiErrorResponse::new(http.status, http.message.clone()).into_response();
        }

        // Storage messages were already logged by the translator.
        if let Some(storage) = error.downcast_ref::<StorageError>() {
            tracing::error!(
                code = %storage.code,
                method = %ctx.method,
                path = %ctx.path,
                "unclassified storage error"
            );
        } else {
            tracing::error!(
                method = %ctx.method,
                path = %ctx.path,
                error = ?error,
                "unhandled error"
            );
        }
        ApiErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            .into_response()
    }
}
