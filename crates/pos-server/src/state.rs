//! Shared application state for the POS catalog server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the product store and the error
//! interceptor chain.

use std::sync::Arc;

use pos_storage::ProductStore;

use crate::fallback::GenericErrorHandler;
use crate::interceptor::{ErrorInterceptor, InterceptorChain};
use crate::translator::StorageErrorTranslator;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Product persistence.
    pub store: Arc<dyn ProductStore>,
    /// Interceptors consulted when a handler fails.
    pub interceptors: InterceptorChain,
}

impl AppState {
    /// State with the standard interceptors: the storage error translator,
    /// falling back to the generic handler, which is also the chain default.
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        let generic: Arc<dyn ErrorInterceptor> = Arc::new(GenericErrorHandler);
        let interceptors = InterceptorChain::new(Arc::clone(&generic))
            .with(Arc::new(StorageErrorTranslator::new(generic)));
        Self::with_interceptors(store, interceptors)
    }

    pub fn with_interceptors(store: Arc<dyn ProductStore>, interceptors: InterceptorChain) -> Self {
        Self {
            store,
            interceptors,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("interceptors", &self.interceptors)
            .finish_non_exhaustive()
    }
}
