#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use doorctl_api::auth::jwt::{generate_access_token, JwtConfig};
use doorctl_api::auth::password::hash_password;
use doorctl_api::config::ServerConfig;
use doorctl_api::router::build_app_router;
use doorctl_api::state::AppState;
use doorctl_core::access::AuditFailurePolicy;
use doorctl_core::roles::ROLE_ADMIN;
use doorctl_db::models::user::{CreateUser, User};
use doorctl_db::repositories::UserRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_body_bytes: 1024 * 1024,
        audit_failure_policy: AuditFailurePolicy::Swallow,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_mins: 60,
        },
    }
}

/// Build the full application router, middleware included, over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Insert an operator with [`TEST_PASSWORD`].
pub async fn create_operator(pool: &PgPool, username: &str) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Insert an operator and mint a bearer token for it.
pub async fn operator_token(pool: &PgPool) -> String {
    let user = create_operator(pool, "operator").await;
    generate_access_token(user.id, &user.username, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Create a door through the API and return its id.
pub async fn create_door(pool: &PgPool, token: &str, name: &str, client_id: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/doors",
        token,
        serde_json::json!({ "name": name, "clientId": client_id }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Register a tag through the API and return its internal id.
pub async fn create_tag(pool: &PgPool, token: &str, tag_id: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tags",
        token,
        serde_json::json!({ "tagId": tag_id, "ownerName": "Test Owner" }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Present `tag_id` at the door bound to `client_id`.
pub async fn validate(pool: &PgPool, tag_id: &str, client_id: &str) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/tags/validate",
        serde_json::json!({ "tagId": tag_id, "clientId": client_id }),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await
}
