//! Product catalog types.
//!
//! [`Product`] is the stored row. [`NewProduct`] is the create payload and
//! [`ProductPatch`] the partial update. All three serialize with camelCase
//! field names to match the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum length of `name`, in characters.
pub const NAME_MAX_LEN: usize = 25;
/// Maximum length of `longDescription`, in characters.
pub const LONG_DESCRIPTION_MAX_LEN: usize = 300;
/// Maximum length of `shortDescription`, in characters.
pub const SHORT_DESCRIPTION_MAX_LEN: usize = 100;

/// Kind of product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres-backend",
    sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    #[default]
    Simple,
    Variable,
    Bundle,
    Service,
}

/// Unit for `weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres-backend",
    sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightUnit {
    G,
    Kg,
    Lb,
    Oz,
}

/// Unit for the packed dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres-backend",
    sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LongUnit {
    Mm,
    Cm,
    M,
    In,
    Ft,
}

/// Lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres-backend",
    sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

/// Sales channels a product is published to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres-backend",
    sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishedScope {
    #[default]
    Web,
    Pos,
    Global,
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub long_description: Option<String>,
    pub short_description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub tags: Vec<String>,
    pub price: f64,
    pub buy_price: Option<f64>,
    pub quantity: i32,
    pub is_featured: bool,
    pub is_taxable: bool,
    pub is_shipping: bool,
    pub is_returnable: bool,
    pub is_refrigerated: bool,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub weight: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub packed_height: Option<f64>,
    pub packed_width: Option<f64>,
    pub packed_depth: Option<f64>,
    pub packed_unit: Option<LongUnit>,
    pub status: ProductStatus,
    pub published_scope: PublishedScope,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub supplier_id: Option<i32>,
}

/// Payload for creating a product. Only `name` is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub buy_price: Option<f64>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "yes")]
    pub is_taxable: bool,
    #[serde(default = "yes")]
    pub is_shipping: bool,
    #[serde(default = "yes")]
    pub is_returnable: bool,
    #[serde(default)]
    pub is_refrigerated: bool,
    #[serde(default, rename = "type")]
    pub product_type: ProductType,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<WeightUnit>,
    #[serde(default)]
    pub packed_height: Option<f64>,
    #[serde(default)]
    pub packed_width: Option<f64>,
    #[serde(default)]
    pub packed_depth: Option<f64>,
    #[serde(default)]
    pub packed_unit: Option<LongUnit>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub published_scope: PublishedScope,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub supplier_id: Option<i32>,
}

const fn yes() -> bool {
    true
}

impl NewProduct {
    /// A product with the given name and every other field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long_description: None,
            short_description: None,
            sku: None,
            barcode: None,
            tags: Vec::new(),
            price: 0.0,
            buy_price: None,
            quantity: 0,
            is_featured: false,
            is_taxable: true,
            is_shipping: true,
            is_returnable: true,
            is_refrigerated: false,
            product_type: ProductType::default(),
            weight: None,
            weight_unit: None,
            packed_height: None,
            packed_width: None,
            packed_depth: None,
            packed_unit: None,
            status: ProductStatus::default(),
            published_scope: PublishedScope::default(),
            published_at: None,
            supplier_id: None,
        }
    }

    /// Materialize the row as it would be stored under `id` at `now`.
    #[must_use]
    pub fn into_product(self, id: i32, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            long_description: self.long_description,
            short_description: self.short_description,
            sku: self.sku,
            barcode: self.barcode,
            tags: self.tags,
            price: self.price,
            buy_price: self.buy_price,
            quantity: self.quantity,
            is_featured: self.is_featured,
            is_taxable: self.is_taxable,
            is_shipping: self.is_shipping,
            is_returnable: self.is_returnable,
            is_refrigerated: self.is_refrigerated,
            product_type: self.product_type,
            weight: self.weight,
            weight_unit: self.weight_unit,
            packed_height: self.packed_height,
            packed_width: self.packed_width,
            packed_depth: self.packed_depth,
            packed_unit: self.packed_unit,
            status: self.status,
            published_scope: self.published_scope,
            published_at: self.published_at,
            created_at: now,
            updated_at: now,
            supplier_id: self.supplier_id,
        }
    }
}

/// Partial update of a product.
///
/// For nullable columns the outer `Option` says whether the field was sent at
/// all and the inner one whether it was `null`: an omitted field is left
/// alone, an explicit `null` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub long_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub short_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub sku: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub barcode: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub buy_price: Option<Option<f64>>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub is_taxable: Option<bool>,
    #[serde(default)]
    pub is_shipping: Option<bool>,
    #[serde(default)]
    pub is_returnable: Option<bool>,
    #[serde(default)]
    pub is_refrigerated: Option<bool>,
    #[serde(default, rename = "type")]
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "present")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub weight_unit: Option<Option<WeightUnit>>,
    #[serde(default, deserialize_with = "present")]
    pub packed_height: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub packed_width: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub packed_depth: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub packed_unit: Option<Option<LongUnit>>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub published_scope: Option<PublishedScope>,
    #[serde(default, deserialize_with = "present")]
    pub published_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub supplier_id: Option<Option<i32>>,
}

/// Only called when the key is present, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl ProductPatch {
    /// Apply the patch to `product` in place and bump `updated_at`.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        set(&mut product.name, self.name);
        set(&mut product.long_description, self.long_description);
        set(&mut product.short_description, self.short_description);
        set(&mut product.sku, self.sku);
        set(&mut product.barcode, self.barcode);
        set(&mut product.tags, self.tags);
        set(&mut product.price, self.price);
        set(&mut product.buy_price, self.buy_price);
        set(&mut product.quantity, self.quantity);
        set(&mut product.is_featured, self.is_featured);
        set(&mut product.is_taxable, self.is_taxable);
        set(&mut product.is_shipping, self.is_shipping);
        set(&mut product.is_returnable, self.is_returnable);
        set(&mut product.is_refrigerated, self.is_refrigerated);
        set(&mut product.product_type, self.product_type);
        set(&mut product.weight, self.weight);
        set(&mut product.weight_unit, self.weight_unit);
        set(&mut product.packed_height, self.packed_height);
        set(&mut product.packed_width, self.packed_width);
        set(&mut product.packed_depth, self.packed_depth);
        set(&mut product.packed_unit, self.packed_unit);
        set(&mut product.status, self.status);
        set(&mut product.published_scope, self.published_scope);
        set(&mut product.published_at, self.published_at);
        set(&mut product.supplier_id, self.supplier_id);
        product.updated_at = now;
    }
}
