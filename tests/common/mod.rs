// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bookmark_metadata::{config::Config, fetch::MetadataFetcher, state::AppState};

/// Build the full application router with the given configuration.
pub fn create_test_app(config: &Config) -> Router {
    let fetcher = MetadataFetcher::new(config).expect("Failed to build HTTP client");
    bookmark_metadata::app(AppState { fetcher })
}

/// Router with default configuration (private targets allowed, so the
/// in-process upstream on 127.0.0.1 is reachable).
pub fn default_app() -> Router {
    create_test_app(&Config::default())
}

/// Serve `router` on an ephemeral localhost port and return its address.
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: Vec<u8>,
    pub json: Value,
}

impl TestResponse {
    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> TestResponse {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> TestResponse {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(app, req).await
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn options(app: Router, uri: &str, body: impl Into<Body>) -> TestResponse {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header(header::ORIGIN, "https://bookmarks.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(body.into())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> TestResponse {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let raw = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    let json: Value = serde_json::from_slice(&raw).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        raw,
        json,
    }
}

// ── Assertions ───────────────────────────────────────────────────────────────

/// Headers every POST/GET `/metadata` response carries.
pub fn assert_metadata_headers(res: &TestResponse) {
    assert_eq!(res.header(header::CONTENT_TYPE), "application/json");
    assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    assert_eq!(
        res.header(header::ACCESS_CONTROL_ALLOW_METHODS),
        "GET, POST, OPTIONS"
    );
    assert_eq!(res.header(header::ACCESS_CONTROL_ALLOW_HEADERS), "Content-Type");
}

/// Body is exactly `{title, description, image}`, all strings.
pub fn assert_metadata_shape(json: &Value) {
    let obj = json.as_object().expect("response body is not an object");
    for key in ["title", "description", "image"] {
        assert!(
            obj.get(key).is_some_and(Value::is_string),
            "{key} is missing or not a string: {json}"
        );
    }
}
