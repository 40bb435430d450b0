#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use server::{routes, HttpOptions, Repositories, ServerState};
use service::auth::{StaticIdentityVerifier, TokenConfig};
use service::media::MemoryMediaStore;
use service::memory::MemoryStore;

pub const JWT_SECRET: &str = "router-test-secret-0123456789";
pub const GOOGLE_TOKEN: &str = "google-id-token";
pub const BOUNDARY: &str = "directory-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub store: Arc<MemoryStore>,
    pub media: Arc<MemoryMediaStore>,
}

pub fn build_app(protect_mutations: bool) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let media = Arc::new(MemoryMediaStore::default());
    let verifier = StaticIdentityVerifier::default().with(GOOGLE_TOKEN, "luz@example.com", Some("Luz Mamani"));
    let state = ServerState::new(
        Repositories::shared(store.clone()),
        media.clone(),
        Arc::new(verifier),
        TokenConfig { jwt_secret: JWT_SECRET.into(), ttl_secs: 3600 },
        HttpOptions { protect_mutations, ..HttpOptions::default() },
    );
    let app = routes::build_router(state.clone(), tower_http::cors::CorsLayer::very_permissive());
    TestApp { app, state, store, media }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

/// Multipart body with text fields and `images` files.
pub fn multipart_body(fields: &[(&str, &str)], images: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (file_name, bytes) in images {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\n").as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Fields of a valid restaurant owned by `user_id`.
pub fn restaurant_fields(name: &str, user_id: &str) -> Vec<(String, String)> {
    vec![
        ("name".into(), name.into()),
        ("location".into(), r#"{"latitude":-17.39,"longitude":-66.15}"#.into()),
        ("offers".into(), r#"["Almuerzo","Cena"]"#.into()),
        ("time".into(), r#"{"weekdays":"08:00-22:00","weekends":"10:00-20:00"}"#.into()),
        ("categories".into(), r#"["Pizzeria"]"#.into()),
        ("codArea".into(), "591".into()),
        ("user_id".into(), user_id.into()),
    ]
}

pub fn as_pairs(fields: &[(String, String)]) -> Vec<(&str, &str)> {
    fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}
