#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use backoffice_api::{
    auth::generate_token,
    build_router,
    config::{Config, Settings},
    state::AppState,
    store::MemoryStore,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // for oneshot
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_hours: 1,
        settings: Settings::default(),
    }
}

/// Router over a fresh in-memory store plus tokens for an admin and a clerk.
pub struct TestApp {
    router: Router,
    pub admin_token: String,
    pub clerk_token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()), test_config());
        let admin_token =
            generate_token(Uuid::new_v4(), "Asha Admin", "admin", JWT_SECRET, 1).unwrap();
        let clerk_token =
            generate_token(Uuid::new_v4(), "Carl Clerk", "staff", JWT_SECRET, 1).unwrap();
        Self {
            router: build_router(state),
            admin_token,
            clerk_token,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(&self.admin_token), body).await
    }

    pub async fn clerk(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(&self.clerk_token), body).await
    }

    pub async fn create_employee(&self, code: &str, base_salary: i64) -> String {
        let (status, body) = self
            .admin(
                Method::POST,
                "/api/v1/employees",
                Some(json!({
                    "employeeCode": code,
                    "firstName": "Test",
                    "lastName": code,
                    "branchId": "main",
                    "baseSalary": base_salary,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

/// Decimals serialize as strings; accept numbers too.
pub fn dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("expected a decimal, got {other}"),
    }
}

pub fn error_kind(body: &Value) -> &str {
    body["error"]["kind"].as_str().unwrap_or_default()
}
