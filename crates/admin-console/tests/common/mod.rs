#![allow(dead_code)]

use admin_console::{
    cache::MemoryPermissionCache, di::DependenciesInject, handler::AppRouter,
    resolver::PermissionResolver, service::build_http_client, state::AppState,
};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Response, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Duration as ChronoDuration;
use http_body_util::BodyExt;
use prometheus_client::registry::Registry;
use serde_json::{Value, json};
use shared::{
    abstract_trait::{DynJwtService, JwtServiceTrait},
    config::JwtConfig,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;

pub const JWT_SECRET: &str = "integration-secret";

/// Role 3 can read samples and sites. Role 5 has no permissions at all.
pub const ANALYST_ROLE: i64 = 3;
pub const EMPTY_ROLE: i64 = 5;

pub fn jwt() -> DynJwtService {
    Arc::new(JwtConfig::new(JWT_SECRET))
}

pub fn token_for(role: &str, role_id: i64, permissions: Option<Vec<&str>>) -> String {
    let claims = JwtConfig::claims_for(
        21,
        "analyst@plant.io",
        role,
        role_id,
        permissions.map(|ps| ps.into_iter().map(String::from).collect()),
        ChronoDuration::minutes(30),
    );
    jwt().generate_token(&claims).unwrap()
}

pub fn expired_token() -> String {
    let claims = JwtConfig::claims_for(
        21,
        "analyst@plant.io",
        "Analyst",
        ANALYST_ROLE,
        None,
        ChronoDuration::minutes(-30),
    );
    jwt().generate_token(&claims).unwrap()
}

#[derive(Clone, Default)]
pub struct BackendCalls {
    pub role_permissions: Arc<AtomicUsize>,
}

impl BackendCalls {
    pub fn role_permissions(&self) -> usize {
        self.role_permissions.load(Ordering::SeqCst)
    }
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] != "correct-horse" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Invalid credentials" })),
        );
    }

    let token = token_for("Analyst", ANALYST_ROLE, None);
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "ok", "data": { "token": token } })),
    )
}

async fn role_permissions(
    State(calls): State<BackendCalls>,
    Path(role_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    calls.role_permissions.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "));

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "missing token" })),
        );
    }

    match role_id {
        ANALYST_ROLE => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "permissions": [
                    { "id": 1, "name": "samples:read" },
                    { "id": 2, "name": "View sites", "resource": "sites", "action": "read" },
                ]}
            })),
        ),
        EMPTY_ROLE => (StatusCode::OK, Json(json!({ "data": [] }))),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "role store unavailable" })),
        ),
    }
}

/// Binds a stand-in for the REST backend on an ephemeral port.
pub async fn start_fake_backend() -> (String, BackendCalls) {
    let calls = BackendCalls::default();

    let app = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/roles/{id}/permissions", get(role_permissions))
        .with_state(calls.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://127.0.0.1:{}", addr.port()), calls)
}

pub fn build_state(backend_url: &str) -> AppState {
    let mut registry = Registry::default();
    let http = build_http_client(Duration::from_secs(5)).unwrap();
    let di_container = DependenciesInject::new(http, backend_url, &mut registry);

    let resolver = PermissionResolver::new(
        di_container.role_client.clone(),
        Arc::new(MemoryPermissionCache::new()),
        Duration::from_secs(60),
    );

    AppState::from_parts(jwt(), di_container, Arc::new(resolver), registry, false)
}

pub async fn build_app() -> (Router, BackendCalls) {
    let (backend_url, calls) = start_fake_backend().await;
    (AppRouter::build(build_state(&backend_url)), calls)
}

/// Serves the console itself on an ephemeral port.
pub async fn start_console(backend_url: &str) -> String {
    let app = AppRouter::build(build_state(backend_url));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://127.0.0.1:{}", addr.port())
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}

pub fn set_cookies(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(String::from)
        .collect()
}
