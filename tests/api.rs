use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use classifieds::{
    app::build_app,
    config::AppConfig,
    state::AppState,
    store::{MemoryStore, StoreError},
    users::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
};

fn test_app() -> Router {
    build_app(AppState::in_memory(AppConfig::in_memory("api-test-secret")))
}

/// Delegates to a memory store and counts every call it receives.
struct CountingUsers {
    inner: Arc<MemoryStore>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl UserStore for CountingUsers {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        UserStore::insert(self.inner.as_ref(), user).await
    }
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_email(email).await
    }
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        UserStore::list_all(self.inner.as_ref()).await
    }
    async fn update_image_url(&self, email: &str, url: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update_image_url(email, url).await
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut req = Request::post(uri).header("content-type", "application/json");
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    req.body(Body::from(body.to_string())).unwrap()
}

fn put_json(uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::put(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut req = Request::get(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    req.body(Body::empty()).unwrap()
}

fn product(pincode: &str) -> Value {
    json!({
        "name": "Bike",
        "description": "Red bike, barely used",
        "category": "Sports",
        "price": 120.0,
        "image_url": "https://img.example/bike.png",
        "address": "1 Main St",
        "state": "KA",
        "pincode": pincode,
    })
}

async fn signup_and_login(app: &Router, name: &str, email: &str) -> String {
    let (status, _) = send(
        app,
        post_json(
            "/signup",
            json!({ "name": name, "email": email, "password": "secret1" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        post_json("/login", json!({ "email": email, "password": "secret1" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn signup_login_list_products_flow() {
    let app = test_app();

    let (status, body) = send(
        &app,
        post_json(
            "/signup",
            json!({ "name": "A", "email": "a@x.com", "password": "secret1" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        post_json("/login", json!({ "email": "a@x.com", "password": "secret1" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["products"], json!([]));

    let (status, body) = send(&app, get("/getproducts", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "products": [] }));
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = test_app();
    let body = json!({ "name": "A", "email": "a@x.com", "password": "secret1" });

    let (status, _) = send(&app, post_json("/signup", body.clone(), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, resp) = send(&app, post_json("/signup", body, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(resp["error"].is_string());
}

#[tokio::test]
async fn login_failures_look_identical() {
    let app = test_app();
    signup_and_login(&app, "A", "a@x.com").await;

    let unknown = send(
        &app,
        post_json("/login", json!({ "email": "b@x.com", "password": "secret1" }), None),
    )
    .await;
    let wrong = send(
        &app,
        post_json("/login", json!({ "email": "a@x.com", "password": "wrong" }), None),
    )
    .await;
    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn short_pincode_is_rejected_and_not_stored() {
    let app = test_app();
    let token = signup_and_login(&app, "A", "a@x.com").await;

    let (status, body) = send(&app, post_json("/addproduct", product("1234"), Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pincode"));

    let (_, body) = send(&app, get("/getproducts", Some(&token))).await;
    assert_eq!(body["products"], json!([]));
}

#[tokio::test]
async fn missing_authorization_makes_no_store_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let memory = Arc::new(MemoryStore::new());
    let users = Arc::new(CountingUsers {
        inner: memory.clone(),
        calls: calls.clone(),
    });
    let state = AppState::from_parts(AppConfig::in_memory("api-test-secret"), users, memory);
    let app = build_app(state);

    let (status, body) = send(&app, get("/getproducts", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, get("/profile", Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn token_for_unknown_user_is_rejected() {
    let state = AppState::in_memory(AppConfig::in_memory("api-test-secret"));
    let token = state.keys.issue("ghost@x.com").unwrap();
    let app = build_app(state);

    let (status, _) = send(&app, get("/getproducts", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn products_are_attributed_to_the_session_owner() {
    let app = test_app();
    let token_a = signup_and_login(&app, "A", "a@x.com").await;
    let token_b = signup_and_login(&app, "B", "b@x.com").await;

    let mut body = product("560001");
    body["email"] = json!("b@x.com");
    let (status, _) = send(&app, post_json("/addproduct", body, Some(&token_a))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = send(&app, get("/getproducts", Some(&token_b))).await;
    let products = all["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["email"], "a@x.com");

    let (_, profile_a) = send(&app, get("/profile", Some(&token_a))).await;
    assert_eq!(profile_a["profile"]["products"].as_array().unwrap().len(), 1);
    let (_, profile_b) = send(&app, get("/profile", Some(&token_b))).await;
    assert_eq!(profile_b["profile"]["products"], json!([]));

    let id = products[0]["id"].as_str().unwrap();
    let (status, one) = send(&app, get(&format!("/product/{id}"), Some(&token_b))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["product"]["name"], "Bike");
}

#[tokio::test]
async fn seller_profile_and_image_update() {
    let app = test_app();
    let token = signup_and_login(&app, "A", "a@x.com").await;

    let (status, _) = send(&app, get("/seller-profile", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, get("/seller-profile?email=nobody@x.com", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, put_json("/image", json!({ "image_url": "" }), &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = send(
        &app,
        put_json("/image", json!({ "image_url": "https://img.example/me.png" }), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, get("/seller-profile?email=a@x.com", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "A");
    assert_eq!(body["data"]["image_url"], "https://img.example/me.png");
}

#[tokio::test]
async fn all_users_hides_password_hashes() {
    let app = test_app();
    let token = signup_and_login(&app, "A", "a@x.com").await;
    signup_and_login(&app, "B", "b@x.com").await;

    let (status, body) = send(&app, get("/allusers", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let resp = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
