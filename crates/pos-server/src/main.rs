//! POS catalog server entry point.
//!
//! Opens the configured product store, then starts the Axum HTTP server with
//! graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use pos_server::config::{ServerConfig, StorageBackendType};
use pos_server::routes;
use pos_server::state::AppState;
use pos_storage::{MemoryBackend, ProductStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(storage = ?storage_kind(&config.storage_backend), "POS catalog starting");

    let store = open_store(&config.storage_backend).await?;
    let app = build_router(Arc::new(AppState::new(store)), config.max_concurrent_requests);

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "POS catalog listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("POS catalog stopped");
    Ok(())
}

fn storage_kind(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Memory => "memory",
        StorageBackendType::Postgres { .. } => "postgres",
    }
}

/// Open the product store selected by configuration.
async fn open_store(backend: &StorageBackendType) -> anyhow::Result<Arc<dyn ProductStore>> {
    match backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (data will not persist)");
            Ok(Arc::new(MemoryBackend::new()))
        }
        #[cfg(feature = "postgres-backend")]
        StorageBackendType::Postgres {
            url,
            max_connections,
        } => {
            info!(url = %"[redacted]", max_connections, "using PostgreSQL storage");
            let backend = pos_storage::PostgresBackend::connect(url, *max_connections)
                .await
                .context("failed to connect to PostgreSQL storage")?;
            Ok(Arc::new(backend))
        }
        #[cfg(not(feature = "postgres-backend"))]
        StorageBackendType::Postgres { .. } => {
            anyhow::bail!(
                "PostgreSQL backend requested but feature 'postgres-backend' is not enabled"
            );
        }
    }
}

/// Wrap the application routes with tracing, CORS, a concurrency cap, and
/// response headers.
fn build_router(state: Arc<AppState>, max_concurrent_requests: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    routes::router(state)
        .layer(tower::limit::ConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
