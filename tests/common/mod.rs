//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the router against a fresh in-memory database and a
//! temporary icon directory. Helper methods are broad so each test file can
//! use the subset it needs.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use financebook::config::Config;
use financebook::db::{bootstrap, create_in_memory_pool, migrations};
use financebook::models::{Category, CategoryType, PaymentItemWithRelations};
use financebook::server;
use financebook::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestClient {
    pub state: AppState,
    _icon_dir: TempDir,
}

impl TestClient {
    /// Fresh in-memory database with migrations and default rows applied.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
            bootstrap::ensure_defaults(&conn).expect("Failed to seed defaults");
        }

        let icon_dir = tempfile::tempdir().expect("Failed to create icon dir");
        let config = Config {
            host: "127.0.0.1".into(),
            port: 8000,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            icon_path: icon_dir.path().to_path_buf(),
        };

        Self {
            state: AppState::new(pool, config),
            _icon_dir: icon_dir,
        }
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_bytes(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json(json_request("POST", uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json(json_request("PUT", uri, body)).await
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await.0
    }

    /// Multipart upload with a single `file` field.
    pub async fn upload(&self, uri: &str, file_name: &str, content: &[u8]) -> (StatusCode, Value) {
        let boundary = "financebook-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();
        self.send_json(request).await
    }

    // =========================================================================
    // Helper methods for creating entities through the API
    // =========================================================================

    pub async fn create_type(&self, name: &str) -> CategoryType {
        let (status, body) = self
            .post_json("/category-types", json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::OK, "create type failed: {}", body);
        serde_json::from_value(body).unwrap()
    }

    pub async fn create_category(
        &self,
        type_id: i64,
        name: &str,
        parent_id: Option<i64>,
        icon_file: Option<&str>,
    ) -> Category {
        let (status, body) = self
            .post_json(
                "/categories",
                json!({
                    "name": name,
                    "type_id": type_id,
                    "parent_id": parent_id,
                    "icon_file": icon_file,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create category failed: {}", body);
        serde_json::from_value(body).unwrap()
    }

    pub async fn create_item(
        &self,
        amount_cents: i64,
        description: &str,
        category_ids: &[i64],
    ) -> PaymentItemWithRelations {
        let (status, body) = self
            .post_json(
                "/payment-items",
                json!({
                    "amount_cents": amount_cents,
                    "date": "2024-03-01",
                    "description": description,
                    "category_ids": category_ids,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create item failed: {}", body);
        serde_json::from_value(body).unwrap()
    }

    pub async fn list_items(&self, uri: &str) -> Vec<PaymentItemWithRelations> {
        let (status, body) = self.get(uri).await;
        assert_eq!(status, StatusCode::OK, "list items failed: {}", body);
        serde_json::from_value(body).unwrap()
    }

    /// Food > Restaurants > FastFood in a fresh "Spending Area" type.
    pub async fn food_tree(&self) -> (CategoryType, Category, Category, Category) {
        let area = self.create_type("Spending Area").await;
        let food = self
            .create_category(area.id, "Food", None, Some("food.png"))
            .await;
        let restaurants = self
            .create_category(area.id, "Restaurants", Some(food.id), None)
            .await;
        let fast_food = self
            .create_category(area.id, "FastFood", Some(restaurants.id), None)
            .await;
        (area, food, restaurants, fast_food)
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
