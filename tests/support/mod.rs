//! Shared scaffolding for the integration tests: an in-process router over
//! the in-memory store, real HS256 tokens, and a oneshot request helper.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt as _;

use review_service::app;
use review_service::app_state::AppState;
use review_service::config::Config;
use review_service::gate::RolePermissionGate;
use review_service::middleware::auth::issue_token;
use review_service::models::review::{NewReviewRecord, Review};
use review_service::store::memory::MemoryReviewStore;
use review_service::store::ReviewStore;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryReviewStore>,
    pub product_id: i32,
}

/// Router over a fresh in-memory store with one registered product.
pub async fn make_app() -> TestApp {
    Config::init();
    let store = Arc::new(MemoryReviewStore::new());
    store.add_product(1).await;
    let state = AppState::new(store.clone(), Arc::new(RolePermissionGate));
    TestApp {
        router: app(state),
        store,
        product_id: 1,
    }
}

pub fn admin_token() -> String {
    issue_token("1", "admin", "admin", &Config::get().jwt_secret).expect("token should sign")
}

pub fn viewer_token() -> String {
    issue_token("7", "viewer", "viewer", &Config::get().jwt_secret).expect("token should sign")
}

pub fn editor_token() -> String {
    issue_token("8", "editor", "editor", &Config::get().jwt_secret).expect("token should sign")
}

/// Seeds a review the way the fixtures in the original suite did.
pub async fn seed_review(store: &MemoryReviewStore, product_id: i32) -> Review {
    store
        .create(
            product_id,
            NewReviewRecord {
                review: "Review content here".to_string(),
                name: "admin".to_string(),
                email: "woo@woo.local".to_string(),
                rating: 0,
            },
        )
        .await
        .expect("memory store create cannot fail")
}

/// Fires one request at the router and returns status plus parsed JSON body.
pub async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should not fail");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, json)
}

pub fn base_url() -> String {
    Config::get().public_url.clone()
}
