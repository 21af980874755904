//! In-memory product store.
//!
//! Rows live in a `BTreeMap` behind a `RwLock`, so listing comes back in id
//! order for free. Nothing is persisted. The backend enforces the same
//! constraints as the `PostgreSQL` schema (column lengths, unique `sku` and
//! `barcode`, the supplier foreign key) so the HTTP layer sees identical
//! errors in development and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::product::{
    LONG_DESCRIPTION_MAX_LEN, NAME_MAX_LEN, SHORT_DESCRIPTION_MAX_LEN,
};
use crate::{NewProduct, Product, ProductPatch, ProductStore, StorageError};

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i32, Product>,
    suppliers: BTreeSet<i32>,
    last_id: i32,
}

/// An in-memory product store.
///
/// Cloning is cheap and clones share the same tables.
///
/// # Examples
///
/// ```
/// # use pos_storage::{MemoryBackend, NewProduct, ProductStore};
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryBackend::new();
/// let apple = store.create(NewProduct::named("Apple")).await.unwrap();
/// assert_eq!(store.find_one(apple.id).await.unwrap(), Some(apple));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryBackend {
    /// Create an empty store with no suppliers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that knows the given supplier ids.
    #[must_use]
    pub fn with_suppliers(ids: impl IntoIterator<Item = i32>) -> Self {
        let tables = Tables {
            suppliers: ids.into_iter().collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

fn check_len(
    operation: &str,
    column: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), StorageError> {
    match value {
        Some(v) if v.chars().count() > max => Err(StorageError::value_too_long(operation, column)),
        _ => Ok(()),
    }
}

impl Tables {
    /// Validate `row` as if it were about to be written under its own id.
    fn check(&self, operation: &str, row: &Product) -> Result<(), StorageError> {
        check_len(operation, "name", Some(&row.name), NAME_MAX_LEN)?;
        check_len(
            operation,
            "long_description",
            row.long_description.as_deref(),
            LONG_DESCRIPTION_MAX_LEN,
        )?;
        check_len(
            operation,
            "short_description",
            row.short_description.as_deref(),
            SHORT_DESCRIPTION_MAX_LEN,
        )?;

        let others = self.products.values().filter(|p| p.id != row.id);
        for other in others {
            if row.sku.is_some() && other.sku == row.sku {
                return Err(StorageError::unique_violation(operation, "sku"));
            }
            if row.barcode.is_some() && other.barcode == row.barcode {
                return Err(StorageError::unique_violation(operation, "barcode"));
            }
        }

        if let Some(supplier_id) = row.supplier_id {
            if !self.suppliers.contains(&supplier_id) {
                return Err(StorageError::record_not_found(
                    operation,
                    "No 'Supplier' record was found for a nested connect on one-to-many relation 'ProductToSupplier'.",
                ));
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryBackend {
    async fn create(&self, product: NewProduct) -> Result<Product, StorageError> {
        let mut tables = self.tables.write().await;
        let id = tables.last_id.checked_add(1).ok_or_else(|| {
            StorageError::other("id_exhausted", "product id sequence is exhausted")
        })?;
        let row = product.into_product(id, Utc::now());
        tables.check("create", &row)?;
        tables.last_id = id;
        tables.products.insert(id, row.clone());
        tracing::debug!(id, "product inserted");
        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().cloned().collect())
    }

    async fn find_one(&self, id: i32) -> Result<Option<Product>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).cloned())
    }

    async fn update(&self, id: i32, patch: ProductPatch) -> Result<Product, StorageError> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.products.get(&id) else {
            return Err(StorageError::record_not_found(
                "update",
                "Record to update not found.",
            ));
        };

        let mut row = current.clone();
        patch.apply(&mut row, Utc::now());
        tables.check("update", &row)?;
        tables.products.insert(id, row.clone());
        Ok(row)
    }

    async fn remove(&self, id: i32) -> Result<Product, StorageError> {
        let mut tables = self.tables.write().await;
        tables.products.remove(&id).ok_or_else(|| {
            StorageError::record_not_found("delete", "Record to delete does not exist.")
        })
    }
}
