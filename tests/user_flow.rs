//! End-to-end user lifecycle against the in-memory store.
//!
//! Drives the real router: register, login, admin listing, update, soft
//! delete, rejected login and reactivation by re-registering.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use worko_backend::{
    api::{router, AppState},
    auth::{JwtConfig, JwtHandler, UserRole},
    config::SessionConfig,
    users::{
        models::{NewUser, User},
        MemoryUserStore, UserService, UserStore,
    },
};

fn jwt() -> Arc<JwtHandler> {
    Arc::new(JwtHandler::new(&JwtConfig {
        access_secret: "integration-access-secret".to_string(),
        refresh_secret: "integration-refresh-secret".to_string(),
        access_ttl: Duration::from_secs(900),
        refresh_ttl: Duration::from_secs(3600),
    }))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_token(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json");
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    builder.body(body).unwrap()
}

fn registration(password: &str) -> Value {
    json!({
        "userData": {
            "name": "Flow User",
            "email": "Flow@Test.com ",
            "password": password,
            "age": "28",
            "city": "Pune",
            "zipCode": 411001,
            "phone": "9876543210"
        }
    })
}

#[tokio::test]
async fn test_full_user_lifecycle() {
    let store = Arc::new(MemoryUserStore::new());
    let jwt = jwt();
    let app = router(AppState {
        users: Arc::new(UserService::new(store.clone(), 4)),
        jwt: jwt.clone(),
        session: SessionConfig::default(),
    });

    // Register
    let (status, body) = send(&app, post_json("/worko/user/create", registration("first-pass"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "flow@test.com");
    assert_eq!(body["data"]["user"]["age"], 28);
    assert_eq!(body["data"]["user"]["role"], "user");
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    // Login
    let (status, body) = send(
        &app,
        post_json(
            "/worko/user/login",
            json!({ "email": "flow@test.com", "password": "first-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["accessToken"].as_str().unwrap().to_string();

    // Plain users cannot list
    let (status, body) = send(&app, with_token("GET", "/worko/user/list", &token, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User does not have correct access rights");

    // Admin lists
    let mut admin = User::new_local(
        NewUser {
            name: "Admin".to_string(),
            email: "admin@test.com".to_string(),
            password: String::new(),
            age: 40,
            city: "Delhi".to_string(),
            zip_code: 110001,
            phone: None,
            google_id: None,
        },
        "unused-hash".to_string(),
    );
    admin.role = UserRole::Admin;
    store.insert(&admin).await.unwrap();
    let admin_token = jwt.generate_access_token(&admin).unwrap();

    let (status, body) = send(
        &app,
        with_token("GET", "/worko/user/list?onlyActive=true", &admin_token, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalUsers"], 2);

    // Update own profile
    let (status, body) = send(
        &app,
        with_token(
            "PUT",
            &format!("/worko/user/update/{}", user_id),
            &token,
            Some(json!({ "updateData": { "city": "Mumbai", "phone": null } })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isUpdated"], true);

    let (_, body) = send(
        &app,
        with_token("GET", &format!("/worko/user/{}", user_id), &token, None),
    )
    .await;
    assert_eq!(body["data"]["user"]["city"], "Mumbai");
    assert!(body["data"]["user"]["phone"].is_null());

    // Soft delete
    let (status, body) = send(
        &app,
        with_token(
            "DELETE",
            &format!("/worko/user/delete/{}", user_id),
            &token,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isDeleted"], true);

    let (status, _) = send(
        &app,
        with_token("GET", &format!("/worko/user/{}", user_id), &admin_token, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        with_token("GET", "/worko/user/list?onlyActive=true", &admin_token, None),
    )
    .await;
    assert_eq!(body["data"]["totalUsers"], 1);

    // Deleted accounts cannot log in
    let (status, _) = send(
        &app,
        post_json(
            "/worko/user/login",
            json!({ "email": "flow@test.com", "password": "first-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Re-registering brings the same account back with the new password
    let (status, body) = send(&app, post_json("/worko/user/create", registration("second-pass"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], user_id.as_str());
    assert_eq!(body["data"]["user"]["isActive"], true);

    let (status, _) = send(
        &app,
        post_json(
            "/worko/user/login",
            json!({ "email": "flow@test.com", "password": "second-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        post_json(
            "/worko/user/login",
            json!({ "email": "flow@test.com", "password": "first-pass" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
