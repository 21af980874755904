//! PostgreSQL product store.
//!
//! Products live in a single `products` table with a foreign key to
//! `suppliers`. Column limits and unique keys are declared in the schema, so
//! constraint failures come back from the server as SQLSTATEs and are
//! classified into [`ErrorCode`]s here.
//!
//! Feature-gated behind `postgres-backend`.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::invocation;
use crate::{ErrorCode, NewProduct, Product, ProductPatch, ProductStore, StorageError};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS suppliers (\
        id   SERIAL       PRIMARY KEY, \
        name VARCHAR(100) NOT NULL\
    )",
    "CREATE TABLE IF NOT EXISTS products (\
        id                SERIAL           PRIMARY KEY, \
        name              VARCHAR(25)      NOT NULL, \
        long_description  VARCHAR(300), \
        short_description VARCHAR(100), \
        sku               TEXT             UNIQUE, \
        barcode           TEXT             UNIQUE, \
        tags              TEXT[]           NOT NULL DEFAULT '{}', \
        price             DOUBLE PRECISION NOT NULL DEFAULT 0, \
        buy_price         DOUBLE PRECISION, \
        quantity          INTEGER          NOT NULL DEFAULT 0, \
        is_featured       BOOLEAN          NOT NULL DEFAULT false, \
        is_taxable        BOOLEAN          NOT NULL DEFAULT true, \
        is_shipping       BOOLEAN          NOT NULL DEFAULT true, \
        is_returnable     BOOLEAN          NOT NULL DEFAULT true, \
        is_refrigerated   BOOLEAN          NOT NULL DEFAULT false, \
        product_type      TEXT             NOT NULL DEFAULT 'SIMPLE', \
        weight            DOUBLE PRECISION, \
        weight_unit       TEXT, \
        packed_height     DOUBLE PRECISION, \
        packed_width      DOUBLE PRECISION, \
        packed_depth      DOUBLE PRECISION, \
        packed_unit       TEXT, \
        status            TEXT             NOT NULL DEFAULT 'DRAFT', \
        published_scope   TEXT             NOT NULL DEFAULT 'WEB', \
        published_at      TIMESTAMPTZ, \
        created_at        TIMESTAMPTZ      NOT NULL DEFAULT now(), \
        updated_at        TIMESTAMPTZ      NOT NULL DEFAULT now(), \
        supplier_id       INTEGER          REFERENCES suppliers (id)\
    )",
];

/// A product store backed by `PostgreSQL`.
///
/// Thread-safe via `PgPool` (connection pool). All operations are fully async.
///
/// # Examples
///
/// ```no_run
/// # use pos_storage::PostgresBackend;
/// # #[tokio::main]
/// # async fn main() {
/// let backend = PostgresBackend::connect("postgres://localhost/pos", 10).await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresBackend")
            .field("pool", &"[PgPool]")
            .finish_non_exhaustive()
    }
}

impl PostgresBackend {
    /// Connect to `PostgreSQL` and create the schema if it is missing.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] tagged `connect` or `migrate` if the
    /// connection or schema creation fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::other("connect", format!("failed to connect: {e}")))?;

        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&pool)
                .await
                .map_err(|e| StorageError::other("migrate", format!("migration failed: {e}")))?;
        }

        tracing::debug!("product schema ready");

        Ok(Self { pool })
    }
}

/// Map a sqlx failure onto the storage taxonomy.
fn classify(operation: &str, err: &sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::RowNotFound => {
            StorageError::record_not_found(operation, "Expected a record, found none.")
        }
        sqlx::Error::Database(db_err) => {
            let detail = format!("{}{}", invocation(operation), db_err.message());
            match db_err.code().as_deref() {
                // string_data_right_truncation
                Some("22001") => StorageError::new(ErrorCode::ValueTooLong, detail),
                // unique_violation
                Some("23505") => StorageError::unique_violation(
                    operation,
                    db_err.constraint().unwrap_or("unknown"),
                ),
                // foreign_key_violation
                Some("23503") => StorageError::new(ErrorCode::RecordNotFound, detail),
                Some(code) => StorageError::other(code, detail),
                None => StorageError::other("database", detail),
            }
        }
        sqlx::Error::PoolTimedOut => StorageError::other("pool_timed_out", err.to_string()),
        sqlx::Error::Io(_) => StorageError::other("io", err.to_string()),
        _ => StorageError::other("driver", err.to_string()),
    }
}

fn push_set<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, value: Option<T>)
where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(", ").push(column).push(" = ").push_bind(value);
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresBackend {
    async fn create(&self, product: NewProduct) -> Result<Product, StorageError> {
        sqlx::query_as::<_, Product>(
            r"INSERT INTO products (
                  name, long_description, short_description, sku, barcode, tags,
                  price, buy_price, quantity, is_featured, is_taxable, is_shipping,
                  is_returnable, is_refrigerated, product_type, weight, weight_unit,
                  packed_height, packed_width, packed_depth, packed_unit, status,
                  published_scope, published_at, supplier_id
              )
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
              RETURNING *",
        )
        .bind(product.name)
        .bind(product.long_description)
        .bind(product.short_description)
        .bind(product.sku)
        .bind(product.barcode)
        .bind(product.tags)
        .bind(product.price)
        .bind(product.buy_price)
        .bind(product.quantity)
        .bind(product.is_featured)
        .bind(product.is_taxable)
        .bind(product.is_shipping)
        .bind(product.is_returnable)
        .bind(product.is_refrigerated)
        .bind(product.product_type)
        .bind(product.weight)
        .bind(product.weight_unit)
        .bind(product.packed_height)
        .bind(product.packed_width)
        .bind(product.packed_depth)
        .bind(product.packed_unit)
        .bind(product.status)
        .bind(product.published_scope)
        .bind(product.published_at)
        .bind(product.supplier_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify("create", &e))
    }

    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify("findMany", &e))
    }

    async fn find_one(&self, id: i32) -> Result<Option<Product>, StorageError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("findUnique", &e))
    }

    async fn update(&self, id: i32, patch: ProductPatch) -> Result<Product, StorageError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = now()");
        push_set(&mut qb, "name", patch.name);
        push_set(&mut qb, "long_description", patch.long_description);
        push_set(&mut qb, "short_description", patch.short_description);
        push_set(&mut qb, "sku", patch.sku);
        push_set(&mut qb, "barcode", patch.barcode);
        push_set(&mut qb, "tags", patch.tags);
        push_set(&mut qb, "price", patch.price);
        push_set(&mut qb, "buy_price", patch.buy_price);
        push_set(&mut qb, "quantity", patch.quantity);
        push_set(&mut qb, "is_featured", patch.is_featured);
        push_set(&mut qb, "is_taxable", patch.is_taxable);
        push_set(&mut qb, "is_shipping", patch.is_shipping);
        push_set(&mut qb, "is_returnable", patch.is_returnable);
        push_set(&mut qb, "is_refrigerated", patch.is_refrigerated);
        push_set(&mut qb, "product_type", patch.product_type);
        push_set(&mut qb, "weight", patch.weight);
        push_set(&mut qb, "weight_unit", patch.weight_unit);
        push_set(&mut qb, "packed_height", patch.packed_height);
        push_set(&mut qb, "packed_width", patch.packed_width);
        push_set(&mut qb, "packed_depth", patch.packed_depth);
        push_set(&mut qb, "packed_unit", patch.packed_unit);
        push_set(&mut qb, "status", patch.status);
        push_set(&mut qb, "published_scope", patch.published_scope);
        push_set(&mut qb, "published_at", patch.published_at);
        push_set(&mut qb, "supplier_id", patch.supplier_id);
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("update", &e))?
            .ok_or_else(|| StorageError::record_not_found("update", "Record to update not found."))
    }

    async fn remove(&self, id: i32) -> Result<Product, StorageError> {
        sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("delete", &e))?
            .ok_or_else(|| {
                StorageError::record_not_found("delete", "Record to delete does not exist.")
            })
    }
}
