//! Harness for tests that need a live PostgreSQL.
//!
//! Connection parameters come from the test-mode variables (`.env` is read
//! when present). Every [`TestApp`] works inside its own schema, so tests
//! can run in parallel against one database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::{Config, DatabaseConfig};
use crate::routes;
use crate::state::AppState;
use crate::store::Store;

pub struct TestApp {
    pub router: Router,
    pub store: Store,
    /// Settings of the per-test schema, for reconnecting after the pool closes
    pub database: DatabaseConfig,
}

impl TestApp {
    /// Returns `None` when no test database is configured or reachable
    pub async fn spawn() -> Option<Self> {
        dotenvy::dotenv().ok();

        let lookup = |key: &str| match key {
            "TEST" => Some("true".to_string()),
            _ => std::env::var(key).ok(),
        };
        let mut config = match Config::from_lookup(lookup) {
            Ok(config) => config,
            Err(e) => {
                println!("No test database configured: {:#}", e);
                return None;
            }
        };
        config.database.schema = Some(format!("test_{}", Uuid::new_v4().simple()));
        config.database.acquire_timeout_secs = 2;

        let store = match Store::connect(&config.database).await {
            Ok(store) => store,
            Err(e) => {
                println!("Test database unreachable: {:#}", e);
                return None;
            }
        };
        store
            .create_tables(true)
            .await
            .expect("Failed to create tables in test schema");

        let state = AppState {
            store: store.clone(),
        };

        Some(Self {
            router: routes::router(state),
            store,
            database: config.database,
        })
    }

    /// Send one request through the router, returning the status and JSON body
    pub async fn send(&self, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, JsonValue) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
        self.send("PATCH", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, JsonValue) {
        self.send("DELETE", uri, None).await
    }

    /// Create a menu and return its id as the API reports it
    pub async fn create_menu(&self, title: &str, description: &str) -> String {
        let (status, body) = self
            .post(
                routes::MENUS,
                serde_json::json!({"title": title, "description": description}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "menu creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_submenu(&self, menu_id: &str, title: &str, description: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/api/v1/menus/{}/submenus", menu_id),
                serde_json::json!({"title": title, "description": description}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "submenu creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_dish(&self, menu_id: &str, submenu_id: &str, title: &str, price: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/api/v1/menus/{}/submenus/{}/dishes", menu_id, submenu_id),
                serde_json::json!({
                    "title": title,
                    "description": format!("{} description", title),
                    "price": price
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "dish creation failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn cleanup(self) {
        if let Err(e) = self.store.drop_schema().await {
            println!("Failed to drop test schema: {:#}", e);
        }
        self.store.close().await;
    }
}
