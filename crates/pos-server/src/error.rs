//! HTTP error types for the POS catalog server.
//!
//! Handlers never build error responses themselves. They return an
//! [`ApiError`], which parks the underlying error in the response extensions;
//! the error interceptor middleware then picks it up and hands it to the
//! registered [`ErrorInterceptor`](crate::interceptor::ErrorInterceptor)s.
//! Every interceptor replies with the same [`ApiErrorResponse`] body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use pos_storage::StorageError;

use crate::interceptor::CaughtError;

/// JSON error response body: `{"statusCode": 409, "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub status_code: u16,
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    /// The status this body is sent with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), axum::Json(self)).into_response()
    }
}

/// An error that already knows its HTTP status (bad path parameter,
/// malformed body, unknown route).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

/// Error returned from HTTP handlers.
///
/// Converts into a placeholder 500 response carrying the [`CaughtError`] as
/// an extension. Outside the interceptor middleware the placeholder is what
/// the client gets.
#[derive(Debug, Clone)]
pub struct ApiError(pub CaughtError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self.0);
        response
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(CaughtError::new(err))
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self(CaughtError::new(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        HttpError::new(status, rejection.body_text()).into()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "path rejected");
        HttpError::bad_request("Validation failed (numeric string is expected)").into()
    }
}
