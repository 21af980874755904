//! Server configuration for the POS catalog.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `POS_*` environment variables.

use std::net::SocketAddr;

/// Port used when neither `POS_BIND_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Maximum number of requests handled at once.
    pub max_concurrent_requests: usize,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// `PostgreSQL`.
    Postgres { url: String, max_connections: u32 },
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `POS_BIND_ADDR` — full bind address (overrides `PORT`)
    /// - `PORT` — port to bind on, binds to `0.0.0.0`
    /// - `POS_STORAGE` — `memory` or `postgres` (default: `memory`)
    /// - `DATABASE_URL` — PostgreSQL connection string (default: `postgres://localhost/pos`)
    /// - `POS_DB_MAX_CONNECTIONS` — connection pool size (default: `10`)
    /// - `POS_LOG_LEVEL` — log filter (default: `info`)
    /// - `POS_MAX_CONCURRENT_REQUESTS` — in-flight request cap (default: `256`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fallback = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));

        // Priority: POS_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = lookup("POS_BIND_ADDR") {
            addr.parse().unwrap_or(fallback)
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            fallback
        };

        let storage_backend = match lookup("POS_STORAGE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => StorageBackendType::Postgres {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "postgres://localhost/pos".to_owned()),
                max_connections: lookup("POS_DB_MAX_CONNECTIONS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
            _ => StorageBackendType::Memory,
        };

        let log_level = lookup("POS_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let max_concurrent_requests = lookup("POS_MAX_CONCURRENT_REQUESTS")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(256);

        Self {
            bind_addr,
            storage_backend,
            log_level,
            max_concurrent_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]);
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.storage_backend, StorageBackendType::Memory);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_concurrent_requests, 256);
    }

    #[test]
    fn zero_concurrency_falls_back_to_default() {
        let config = load(&[("POS_MAX_CONCURRENT_REQUESTS", "0")]);
        assert_eq!(config.max_concurrent_requests, 256);
    }

    #[test]
    fn bind_addr_wins_over_port() {
        let config = load(&[("POS_BIND_ADDR", "10.0.0.1:8080"), ("PORT", "9000")]);
        assert_eq!(config.bind_addr, SocketAddr::from(([10, 0, 0, 1], 8080)));
    }

    #[test]
    fn port_binds_all_interfaces() {
        let config = load(&[("PORT", "9000")]);
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
    }

    #[test]
    fn postgres_storage() {
        let config = load(&[
            ("POS_STORAGE", "Postgres"),
            ("DATABASE_URL", "postgres://db/catalog"),
            ("POS_DB_MAX_CONNECTIONS", "4"),
        ]);
        assert_eq!(
            config.storage_backend,
            StorageBackendType::Postgres {
                url: "postgres://db/catalog".to_owned(),
                max_connections: 4,
            }
        );
    }

    #[test]
    fn unknown_storage_is_memory() {
        let config = load(&[("POS_STORAGE", "rocksdb")]);
        assert_eq!(config.storage_backend, StorageBackendType::Memory);
    }
}
