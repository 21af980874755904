//! Typed error interceptors.
//!
//! An [`InterceptorChain`] holds an ordered list of [`ErrorInterceptor`]s
//! plus one default. A caught error goes to the first interceptor whose
//! [`matches`](ErrorInterceptor::matches) predicate accepts it; if none does,
//! the default handles it. Interceptors that only cover part of an error type
//! hold their own fallback and call it directly.

use std::fmt;
use std::sync::Arc;

use axum::http::Method;
use axum::response::Response;

/// A type-erased error caught on its way out of a handler.
///
/// Cheap to clone; clones share the same underlying error.
#[derive(Clone)]
pub struct CaughtError(Arc<dyn std::error::Error + Send + Sync + 'static>);

impl CaughtError {
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Arc::new(err))
    }

    /// Whether the underlying error is of type `E`.
    #[must_use]
    pub fn is<E: std::error::Error + 'static>(&self) -> bool {
        self.0.is::<E>()
    }

    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// Whether both handles point at the same error value.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for CaughtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for CaughtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// The request an error was caught in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
}

/// Turns a caught error into a response.
pub trait ErrorInterceptor: Send + Sync {
    /// Type predicate: whether this interceptor handles `error`.
    fn matches(&self, error: &CaughtError) -> bool;

    /// Build the response for `error`.
    fn intercept(&self, error: CaughtError, ctx: &RequestContext) -> Response;
}

/// Ordered interceptors plus a default.
#[derive(Clone)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn ErrorInterceptor>>,
    default: Arc<dyn ErrorInterceptor>,
}

impl InterceptorChain {
    /// A chain with no interceptors; everything goes to `default`.
    pub fn new(default: Arc<dyn ErrorInterceptor>) -> Self {
        Self {
            interceptors: Vec::new(),
            default,
        }
    }

    /// Register `interceptor` after the ones already registered.
    #[must_use]
    pub fn with(mut self, interceptor: Arc<dyn ErrorInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Number of registered interceptors, not counting the default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn dispatch(&self, error: CaughtError, ctx: &RequestContext) -> Response {
        let handler = self
            .interceptors
            .iter()
            .find(|i| i.matches(&error))
            .unwrap_or(&self.default);
        handler.intercept(error, ctx)
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::error::HttpError;
    use pos_storage::StorageError;

    /// Accepts errors of type `E` and answers with a fixed status.
    struct Fixed<E> {
        status: StatusCode,
        seen: Mutex<usize>,
        _marker: std::marker::PhantomData<fn() -> E>,
    }

    impl<E> Fixed<E> {
        fn new(status: StatusCode) -> Arc<Self> {
            Arc::new(Self {
                status,
                seen: Mutex::new(0),
                _marker: std::marker::PhantomData,
            })
        }

        fn seen(&self) -> usize {
            *self.seen.lock().unwrap()
        }
    }

    impl<E: std::error::Error + 'static> ErrorInterceptor for Fixed<E> {
        fn matches(&self, error: &CaughtError) -> bool {
            error.is::<E>()
        }

        fn intercept(&self, _error: CaughtError, _ctx: &RequestContext) -> Response {
            *self.seen.lock().unwrap() += 1;
            self.status.into_response()
        }
    }

    fn ctx() -> RequestContext {
        RequestContext {
            method: Method::GET,
            path: "/products/1".to_owned(),
        }
    }

    #[test]
    fn empty_chain_uses_default() {
        let default = Fixed::<HttpError>::new(StatusCode::INTERNAL_SERVER_ERROR);
        let chain = InterceptorChain::new(default.clone());
        assert!(chain.is_empty());

        let res = chain.dispatch(CaughtError::new(StorageError::other("x", "y")), &ctx());
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(default.seen(), 1);
    }

    #[test]
    fn first_matching_interceptor_wins() {
        let default = Fixed::<HttpError>::new(StatusCode::INTERNAL_SERVER_ERROR);
        let first = Fixed::<StorageError>::new(StatusCode::CONFLICT);
        let second = Fixed::<StorageError>::new(StatusCode::GONE);
        let chain = InterceptorChain::new(default.clone())
            .with(first.clone())
            .with(second.clone());
        assert_eq!(chain.len(), 2);

        let res = chain.dispatch(CaughtError::new(StorageError::other("x", "y")), &ctx());
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!((first.seen(), second.seen(), default.seen()), (1, 0, 0));
    }

    #[test]
    fn unmatched_type_falls_through_to_default() {
        let default = Fixed::<HttpError>::new(StatusCode::IM_A_TEAPOT);
        let storage = Fixed::<StorageError>::new(StatusCode::CONFLICT);
        let chain = InterceptorChain::new(default.clone()).with(storage.clone());

        let res = chain.dispatch(CaughtError::new(HttpError::bad_request("nope")), &ctx());
        assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!((storage.seen(), default.seen()), (0, 1));
    }

    #[test]
    fn caught_error_downcasts_and_compares_identity() {
        let err = CaughtError::new(HttpError::not_found("Cannot GET /x"));
        let clone = err.clone();
        let other = CaughtError::new(HttpError::not_found("Cannot GET /x"));

        assert_eq!(
            err.downcast_ref::<HttpError>().map(|e| e.status),
            Some(StatusCode::NOT_FOUND)
        );
        assert!(err.downcast_ref::<StorageError>().is_none());
        assert!(err.same_as(&clone));
        assert!(!err.same_as(&other));
        assert_eq!(err.to_string(), "Cannot GET /x");
    }
}
