use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tenancy_core::api::{self, AppState, StaticIdentityProvider};
use tenancy_core::config::{Config, DevToken};
use tenancy_core::lifecycle::TenancySystem;
use tenancy_core::store::{MemoryStore, USERS};
use tower::ServiceExt;

fn dev_token(token: &str, subject: &str) -> DevToken {
    DevToken {
        token: token.to_string(),
        subject: subject.to_string(),
        email: None,
        name: None,
    }
}

fn start() -> (Arc<MemoryStore>, TenancySystem, Router) {
    let store = Arc::new(MemoryStore::new().with_unique_index(USERS, "email"));
    let system = TenancySystem::start(store.clone(), &Config::test());
    let identity = StaticIdentityProvider::new(&[
        dev_token("alice", "auth0|123"),
        dev_token("bob", "auth0|456"),
    ]);
    let router = api::router(AppState::new(system.clone(), Arc::new(identity)));
    (store, system, router)
}

fn app() -> (Arc<MemoryStore>, Router) {
    let (store, _system, router) = start();
    (store, router)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    tenant: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(tenant) = tenant {
        request = request.header("x-tenant", tenant);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    read(app, request).await
}

async fn read(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, token: &str, email: &str) {
    let body = json!({"email": email, "firstName": "John", "lastName": "Doe"});
    let (status, _) = send(app, "POST", "/users/register", Some(token), None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_then_me() {
    let (_store, app) = app();
    let body = json!({"email": "a@b.com", "firstName": "John", "lastName": "Doe"});

    let (status, profile) =
        send(&app, "POST", "/users/register", Some("alice"), None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(profile["id"].is_string());
    assert!(profile["registeredAt"].is_string());
    assert_eq!(profile["firstName"], "John");

    let (status, err) =
        send(&app, "POST", "/users/register", Some("alice"), None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "conflict");

    let (status, me) = send(&app, "GET", "/users/me", Some("alice"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["firstName"], "John");
    assert_eq!(me["email"], "a@b.com");
}

#[tokio::test]
async fn test_authentication_errors() {
    let (_store, app) = app();

    let (status, _) = send(&app, "GET", "/users/me", Some("forged"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/users/me", None, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/users/me", Some("alice"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "registration required");

    let (status, body) = send(&app, "GET", "/health", None, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_validation_errors() {
    let (_store, app) = app();

    let body = json!({"email": "not-an-email", "firstName": "John", "lastName": "Doe"});
    let (status, err) =
        send(&app, "POST", "/users/register", Some("alice"), None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation");

    let (status, _) =
        send(&app, "POST", "/users/register", Some("alice"), None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    register(&app, "alice", "a@b.com").await;
    let body = json!({"name": "!!!"});
    let (status, _) = send(&app, "POST", "/tenants", Some("alice"), None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_bodies_are_validation_errors() {
    let (_store, app) = app();

    let body = json!({"email": 5, "firstName": "John", "lastName": "Doe"});
    let (status, err) =
        send(&app, "POST", "/users/register", Some("alice"), None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation");
    assert!(err["message"].is_string());

    // No Content-Type header.
    let request = Request::builder()
        .method("POST")
        .uri("/users/register")
        .header(header::AUTHORIZATION, "Bearer alice")
        .body(Body::from(r#"{"email":"a@b.com","firstName":"John","lastName":"Doe"}"#))
        .unwrap();
    let (status, err) = read(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation");

    register(&app, "alice", "a@b.com").await;
    let request = Request::builder()
        .method("POST")
        .uri("/tenants")
        .header(header::AUTHORIZATION, "Bearer alice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, err) = read(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation");
}

#[tokio::test]
async fn test_tenant_lifecycle_over_http() {
    let (_store, app) = app();
    register(&app, "alice", "a@b.com").await;

    let body = json!({"name": "My New Tenant", "description": "desc"});
    let (status, created) = send(&app, "POST", "/tenants", Some("alice"), None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["systemName"], "my-new-tenant");

    let body = json!({"name": "My New Tenant", "description": "other"});
    let (status, _) = send(&app, "POST", "/tenants", Some("alice"), None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, current) =
        send(&app, "GET", "/tenants", Some("alice"), Some("My-New-Tenant"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["systemName"], "my-new-tenant");
    assert_eq!(current["name"], "My New Tenant");
    assert_eq!(current["description"], "desc");
    assert_eq!(current["storagePrefix"], created["storagePrefix"]);
    assert_eq!(current["createdAt"], created["createdAt"]);
    assert!(current.get("id").is_none());

    let (status, list) =
        send(&app, "GET", "/tenants/accessible", Some("alice"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["description"], "desc");
}

#[tokio::test]
async fn test_tenant_scope_errors() {
    let (_store, app) = app();
    register(&app, "alice", "a@b.com").await;
    register(&app, "bob", "c@d.com").await;
    let body = json!({"name": "Acme", "description": ""});
    let (status, _) = send(&app, "POST", "/tenants", Some("alice"), None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "GET", "/tenants", Some("alice"), None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(&app, "GET", "/tenants", Some("alice"), Some("globex"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob is authenticated but not a member of Acme.
    let (status, err) = send(&app, "GET", "/tenants", Some("bob"), Some("acme"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"], "forbidden");
    assert!(!err["message"].as_str().unwrap().contains("acme"));

    let (status, _) = send(&app, "GET", "/tenants", None, Some("acme"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_outage_is_service_unavailable() {
    let (store, app) = app();
    store.set_available(false);

    let (status, err) = send(&app, "GET", "/users/me", Some("alice"), None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err["error"], "infrastructure");
}

#[tokio::test]
async fn test_anonymous_requests_activate_no_tenants() {
    let (_store, system, app) = start();

    for i in 0..50 {
        let tenant = format!("junk-{}", i);
        let (status, _) = send(&app, "GET", "/tenants", None, Some(tenant.as_str()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(system.active_count(), 0);
}
