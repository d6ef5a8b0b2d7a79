#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use lifeplan_core::goals::{KeepStoredProgress, ProgressDerivation};
use lifeplan_server::{api::app_router, build_state_with_derivation, config::Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// A router over a throwaway database. The directory lives as long as this value.
pub struct TestApp {
    pub router: Router,
    pub db_path: PathBuf,
    _tmp: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_derivation(Arc::new(KeepStoredProgress)).await
    }

    pub async fn with_derivation(derivation: Arc<dyn ProgressDerivation>) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test.db");
        let config = Config::for_db_path(db_path.to_string_lossy());
        let state = build_state_with_derivation(&config, derivation)
            .await
            .unwrap();
        Self {
            router: app_router(state, &config),
            db_path,
            _tmp: tmp,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(method, uri, Some(token), Some(body.to_string()))
            .await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    /// Registers `email` and returns its access token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "email": email, "password": "hunter2hunter2" }).to_string()),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    /// Creates a goal and returns its id.
    pub async fn create_goal(&self, token: &str, goal: Value) -> String {
        let (status, body) = self.json(Method::POST, "/api/goals", token, goal).await;
        assert_eq!(status, StatusCode::CREATED, "create goal failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}
