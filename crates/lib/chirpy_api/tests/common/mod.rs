//! Shared helpers: an in-memory app and a one-shot request driver.

#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chirpy_api::{AppState, config::ApiConfig};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-secret";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _files: TempDir,
}

/// Build an app over an in-memory store with a throwaway `/app` directory.
pub fn test_app(platform: &str) -> TestApp {
    let files = tempfile::tempdir().expect("tempdir");
    std::fs::write(files.path().join("index.html"), "<h1>Chirpy</h1>").expect("index.html");

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: String::new(),
        platform: platform.into(),
        jwt_secret: JWT_SECRET.into(),
        polka_key: POLKA_KEY.into(),
        filepath_root: files.path().to_path_buf(),
        request_timeout: Duration::from_secs(10),
    };
    let state = AppState::in_memory(config);
    TestApp {
        router: chirpy_api::router(state.clone()),
        state,
        _files: files,
    }
}

impl TestApp {
    /// Send one request. `auth` is the full `Authorization` header value.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            req = req.header(header::AUTHORIZATION, auth);
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("request");

        let resp = self.router.clone().oneshot(req).await.expect("response");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn signup(&self, email: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        body
    }

    pub async fn login(&self, email: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body
    }

    /// Sign up and log in, returning the login response.
    pub async fn session(&self, email: &str) -> Value {
        self.signup(email, "hunter2").await;
        self.login(email, "hunter2").await
    }
}

pub fn bearer(token: &Value) -> String {
    format!("Bearer {}", token.as_str().expect("token string"))
}
