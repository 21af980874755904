//! End-to-end tests for the product API.
//!
//! Drive the full router (interceptor middleware included) in-process with
//! `tower::ServiceExt::oneshot` against an in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use pos_server::routes;
use pos_server::state::AppState;
use pos_storage::{
    MemoryBackend, NewProduct, Product, ProductPatch, ProductStore, StorageError,
};

fn app_with(store: Arc<dyn ProductStore>) -> Router {
    routes::router(Arc::new(AppState::new(store)))
}

fn app() -> Router {
    app_with(Arc::new(MemoryBackend::with_suppliers([1])))
}

/// Send one request and return (status, parsed JSON body).
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ── CRUD ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_fetch() {
    let app = app();
    let (status, created) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({"name": "Apple", "sku": "ABC123", "price": 9.99, "tags": ["fruit"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["sku"], "ABC123");
    assert_eq!(created["isTaxable"], true);
    assert_eq!(created["type"], "SIMPLE");

    let (status, fetched) = send(&app, Method::GET, "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_returns_all_in_id_order() {
    let app = app();
    for name in ["Apple", "Banana"] {
        send(&app, Method::POST, "/products", Some(json!({"name": name}))).await;
    }
    let (status, list) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["Apple", "Banana"]);
}

#[tokio::test]
async fn patch_null_clears_and_omitted_keeps() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/products",
        Some(json!({"name": "Apple", "sku": "ABC123", "barcode": "123456789"})),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PATCH,
        "/products/1",
        Some(json!({"sku": null, "quantity": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["sku"].is_null());
    assert_eq!(updated["barcode"], "123456789");
    assert_eq!(updated["quantity"], 10);
}

#[tokio::test]
async fn delete_returns_removed_product() {
    let app = app();
    send(&app, Method::POST, "/products", Some(json!({"name": "Apple"}))).await;

    let (status, removed) = send(&app, Method::DELETE, "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["name"], "Apple");

    let (status, body) = send(&app, Method::GET, "/products/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn fetch_missing_is_200_null() {
    let (status, body) = send(&app(), Method::GET, "/products/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

// ── Storage error translation ────────────────────────────────────────

#[tokio::test]
async fn name_too_long_is_400_on_one_line() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/products",
        Some(json!({"name": "a name well over twenty-five characters"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains('\n'));
    assert!(message.ends_with("Column: name"));
    assert_eq!(body.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_sku_is_409() {
    let app = app();
    send(&app, Method::POST, "/products", Some(json!({"name": "Apple", "sku": "ABC123"}))).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(json!({"name": "Pear", "sku": "ABC123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["statusCode"], 409);
    assert!(body["message"].as_str().unwrap().contains("Unique constraint failed"));
}

#[tokio::test]
async fn update_missing_is_404() {
    let (status, body) = send(
        &app(),
        Method::PATCH,
        "/products/99",
        Some(json!({"name": "Ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn delete_missing_is_404() {
    let (status, body) = send(&app(), Method::DELETE, "/products/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["statusCode"], 404);
}

#[tokio::test]
async fn unknown_supplier_is_404() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/products",
        Some(json!({"name": "Apple", "supplierId": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Store whose every call fails with an unclassified storage error.
struct Unavailable;

#[async_trait::async_trait]
impl ProductStore for Unavailable {
    async fn create(&self, _product: NewProduct) -> Result<Product, StorageError> {
        Err(StorageError::other("connection timeout", "pool timed out\nafter 30s"))
    }

    async fn find_all(&self) -> Result<Vec<Product>, StorageError> {
        Err(StorageError::other("connection timeout", "pool timed out\nafter 30s"))
    }

    async fn find_one(&self, _id: i32) -> Result<Option<Product>, StorageError> {
        Err(StorageError::other("connection timeout", "pool timed out\nafter 30s"))
    }

    async fn update(&self, _id: i32, _patch: ProductPatch) -> Result<Product, StorageError> {
        Err(StorageError::other("connection timeout", "pool timed out\nafter 30s"))
    }

    async fn remove(&self, _id: i32) -> Result<Product, StorageError> {
        Err(StorageError::other("connection timeout", "pool timed out\nafter 30s"))
    }
}

#[tokio::test]
async fn unclassified_storage_error_is_generic_500() {
    let app = app_with(Arc::new(Unavailable));
    let (status, body) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"statusCode": 500, "message": "Internal server error"})
    );
}

// ── Request shape errors ─────────────────────────────────────────────

#[tokio::test]
async fn non_numeric_id_is_400() {
    let (status, body) = send(&app(), Method::GET, "/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"statusCode": 400, "message": "Validation failed (numeric string is expected)"})
    );
}

#[tokio::test]
async fn wrong_field_type_is_400() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/products",
        Some(json!({"name": "Apple", "price": "cheap"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn unknown_enum_value_is_400() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/products",
        Some(json!({"name": "Apple", "status": "SOLD_OUT"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsupported_method_is_404_json() {
    let (status, body) = send(
        &app(),
        Method::PUT,
        "/products/1",
        Some(json!({"name": "Apple"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"statusCode": 404, "message": "Cannot PUT /products/1"})
    );
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let (status, body) = send(&app(), Method::GET, "/suppliers", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"statusCode": 404, "message": "Cannot GET /suppliers"})
    );
}
