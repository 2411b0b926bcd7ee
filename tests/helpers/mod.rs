//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use brainery_api::{AppState, build_app};
use brainery_core::config::{AppConfig, StoreBackend};
use brainery_database::StoreSet;
use brainery_entity::identity::Role;

pub const PASSWORD: &str = "Abc123!";

/// A router over fresh in-memory stores of one backend.
pub struct TestApp {
    pub router: Router,
    pub stores: StoreSet,
    pub config: AppConfig,
}

/// Status, decoded JSON body, and the `Set-Cookie` header of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone)]
pub struct LoggedIn {
    pub token: String,
    pub csrf_token: String,
    pub landing: String,
    pub user_id: String,
}

impl TestApp {
    pub async fn new(backend: StoreBackend) -> Self {
        let mut config = AppConfig::default();
        config.database.backend = backend;
        let stores = StoreSet::in_memory(backend)
            .await
            .expect("Failed to open in-memory stores");
        let router = build_app(AppState::new(config.clone(), stores.clone()));
        Self {
            router,
            stores,
            config,
        }
    }

    /// Send a request, optionally authenticated with a bearer token.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder, body).await
    }

    /// Send a request authenticated by the session cookie, the way a
    /// browser does, with an optional CSRF header.
    pub async fn request_with_cookie(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: &str,
        csrf: Option<&str>,
    ) -> TestResponse {
        let cookie = format!("{}={token}", self.config.session.cookie_name);
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::COOKIE, cookie);
        if let Some(csrf) = csrf {
            builder = builder.header("x-csrf-token", csrf);
        }
        self.send(builder, body).await
    }

    /// Send a body verbatim with a JSON content type, whether or not it parses.
    pub async fn request_raw(&self, method: &str, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.dispatch(request).await
    }

    async fn send(&self, builder: axum::http::request::Builder, body: Option<Value>) -> TestResponse {
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            set_cookie,
        }
    }

    /// Register through the API and assert it succeeded.
    pub async fn register(&self, first: &str, email: &str) -> TestResponse {
        let response = self
            .request(
                "POST",
                "/register",
                Some(json!({
                    "first_name": first,
                    "last_name": "Tester",
                    "email": email,
                    "password": PASSWORD,
                    "confirm_password": PASSWORD,
                    "selected_plan": "free",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response
    }

    /// Log in through the API and assert it succeeded.
    pub async fn login(&self, email: &str, password: &str) -> LoggedIn {
        let response = self
            .request(
                "POST",
                "/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        let text = |key: &str| response.body[key].as_str().unwrap_or_default().to_string();
        LoggedIn {
            token: text("token"),
            csrf_token: text("csrf_token"),
            landing: text("landing"),
            user_id: response.body["user"]["id"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Register and log in a regular user.
    pub async fn user(&self, first: &str, email: &str) -> LoggedIn {
        self.register(first, email).await;
        self.login(email, PASSWORD).await
    }

    /// Register a user, promote them directly in the store, and log in.
    pub async fn admin(&self, email: &str) -> LoggedIn {
        self.register("Admin", email).await;
        let identity = self
            .stores
            .identities
            .find_by_email(email)
            .await
            .expect("lookup")
            .expect("registered identity");
        self.stores
            .identities
            .update_role(&identity.id, Role::Admin)
            .await
            .expect("promote");
        self.login(email, PASSWORD).await
    }
}
