//! Product storage for the POS catalog.
//!
//! This crate defines the [`ProductStore`] trait, the CRUD surface the HTTP
//! layer delegates to. It also holds the product types and the
//! [`StorageError`] taxonomy every backend reports constraint failures in.
//!
//! Two implementations are provided:
//!
//! - [`PostgresBackend`] — production backend on `PostgreSQL` (feature `postgres-backend`)
//! - [`MemoryBackend`] — in-memory, enforces the same column and key constraints

mod error;
mod memory;
#[cfg(feature = "postgres-backend")]
mod postgres_backend;
pub mod product;

pub use error::{ErrorCode, StorageError};
pub use memory::MemoryBackend;
#[cfg(feature = "postgres-backend")]
pub use postgres_backend::PostgresBackend;
pub use product::{NewProduct, Product, ProductPatch};

/// A pluggable product store.
///
/// Each method maps onto one statement against the `products` table.
/// Constraint failures are reported as [`StorageError`]s with a recognized
/// [`ErrorCode`]; anything else carries the backend's own code.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync + 'static {
    /// Insert a new product and return the stored row.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::ValueTooLong`] if a text column exceeds its limit,
    /// [`ErrorCode::UniqueViolation`] on a duplicate `sku` or `barcode`,
    /// [`ErrorCode::RecordNotFound`] if `supplier_id` names no supplier.
    async fn create(&self, product: NewProduct) -> Result<Product, StorageError>;

    /// Return every product ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    async fn find_all(&self) -> Result<Vec<Product>, StorageError>;

    /// Look up a product by id. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend fails.
    async fn find_one(&self, id: i32) -> Result<Option<Product>, StorageError>;

    /// Apply a partial update and return the updated row.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::RecordNotFound`] if no product has this id, plus the
    /// constraint errors of [`create`](ProductStore::create).
    async fn update(&self, id: i32, patch: ProductPatch) -> Result<Product, StorageError>;

    /// Delete a product and return the removed row.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::RecordNotFound`] if no product has this id.
    async fn remove(&self, id: i32) -> Result<Product, StorageError>;
}
