//! Storage error translation.
//!
//! [`StorageErrorTranslator`] is the interceptor for [`StorageError`]. It logs
//! the raw message, then answers the three known constraint categories with
//! a 4xx [`ApiErrorResponse`]. Every other category is handed, unchanged, to
//! the fallback interceptor it was constructed with.
//!
//! | Category | Status |
//! |---|---|
//! | [`ErrorCode::ValueTooLong`] | 400 Bad Request |
//! | [`ErrorCode::UniqueViolation`] | 409 Conflict |
//! | [`ErrorCode::RecordNotFound`] | 404 Not Found |
//! | anything else | fallback |

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pos_storage::{ErrorCode, StorageError};

use crate::error::ApiErrorResponse;
use crate::interceptor::{CaughtError, ErrorInterceptor, RequestContext};

/// Strip every newline from a storage message.
#[must_use]
pub fn sanitize(message: &str) -> String {
    message.replace('\n', "")
}

/// Interceptor that maps [`StorageError`] categories to HTTP statuses.
pub struct StorageErrorTranslator {
    fallback: Arc<dyn ErrorInterceptor>,
}

impl StorageErrorTranslator {
    pub fn new(fallback: Arc<dyn ErrorInterceptor>) -> Self {
        Self { fallback }
    }

    /// Status for a category, or `None` if the fallback owns it.
    #[must_use]
    pub fn status_for(code: &ErrorCode) -> Option<StatusCode> {
        match code {
            ErrorCode::ValueTooLong => Some(StatusCode::BAD_REQUEST),
            ErrorCode::UniqueViolation => Some(StatusCode::CONFLICT),
            ErrorCode::RecordNotFound => Some(StatusCode::NOT_FOUND),
            ErrorCode::Other(_) => None,
        }
    }

    /// The client-facing body for `err`, or `None` if the fallback owns it.
    #[must_use]
    pub fn translate(err: &StorageError) -> Option<ApiErrorResponse> {
        Self::status_for(&err.code)
            .map(|status| ApiErrorResponse::new(status, sanitize(&err.message)))
    }
}

impl ErrorInterceptor for StorageErrorTranslator {
    fn matches(&self, error: &CaughtError) -> bool {
        error.is::<StorageError>()
    }

    fn intercept(&self, error: CaughtError, ctx: &RequestContext) -> Response {
        let body = error.downcast_ref::<StorageError>().and_then(|err| {
            tracing::error!(
                code = %err.code,
                method = %ctx.method,
                path = %ctx.path,
                "{}",
                err.message
            );
            Self::translate(err)
        });

        match body {
            Some(body) => body.into_response(),
            None => self.fallback.intercept(error, ctx),
        }
    }
}

impl std::fmt::Debug for StorageErrorTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageErrorTranslator").finish_non_exhaustive()
    }
}
