//! POS catalog HTTP server.
//!
//! Wires the product store and the error interceptors into a running Axum
//! server. Serves the product CRUD API at `/products` and a liveness probe
//! at `/health`.

pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod interceptor;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod translator;
