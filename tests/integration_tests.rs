use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use qtable::{
    config::Config,
    create_app,
    database::{MemoryStore, QuoteStore, UserStore},
    errors::{AppError, Result},
    handlers::AppState,
    models::{UpstreamQuote, User},
    services::{Mailer, MetricsService, QuoteSource},
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::Mutex;
use tower::ServiceExt;

#[derive(Default)]
struct StubSource {
    random_calls: AtomicUsize,
    list_calls: AtomicUsize,
    fail: bool,
}

impl StubSource {
    fn new() -> Self {
        Self::default()
    }

    fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

#[async_trait]
impl QuoteSource for StubSource {
    async fn random_quotes(&self) -> Result<Vec<UpstreamQuote>> {
        self.random_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Upstream("connection refused".to_string()));
        }
        Ok(vec![UpstreamQuote {
            content: "A".to_string(),
            author: "B".to_string(),
        }])
    }

    async fn list_quotes(&self, page: Option<u32>) -> Result<Value> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "page": page, "results": [{"content": "C", "author": "D"}] }))
    }
}

#[derive(Default)]
struct RecordingMailer {
    links: Mutex<Vec<String>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, _user: &User, link: &str) -> Result<()> {
        self.links.lock().await.push(link.to_string());
        Ok(())
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    source: Arc<StubSource>,
    mailer: Arc<RecordingMailer>,
}

fn test_config() -> Config {
    Config {
        database_url: None,
        database_max_connections: 1,
        port: 3000,
        quote_api_url: "http://quotes.invalid".to_string(),
        quote_api_timeout_secs: 1,
        jwt_secret: "integration-secret".to_string(),
        public_base_url: "http://localhost:3000".to_string(),
        email_token_ttl_hours: 24,
        bcrypt_cost: 4,
    }
}

fn test_app_with(source: StubSource) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(source);
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(
        &test_config(),
        store.clone(),
        source.clone(),
        mailer.clone(),
        Arc::new(MetricsService::new().unwrap()),
    );

    TestApp { router: create_app(state), store, source, mailer }
}

fn test_app() -> TestApp {
    test_app_with(StubSource::new())
}

async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION].to_str().unwrap().to_string()
}

fn signup_body(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "password1": "analytical42",
        "password2": "analytical42"
    })
}

/// Registers, verifies and signs in a user, returning the access token.
async fn signed_in(app: &TestApp, username: &str) -> String {
    let response = send(app, post_json("/users/signup", signup_body(username, &format!("{}@example.com", username)))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let link = app.mailer.links.lock().await.last().cloned().unwrap();
    let path = link.trim_start_matches("http://localhost:3000");
    let response = send(app, get(path, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        app,
        post_json("/users/login", json!({"username": username, "password": "analytical42"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/health/ready", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["checks"]["store"], "healthy");
}

#[tokio::test]
async fn test_index_creates_quote_once_per_day() {
    let app = test_app();

    let first = json_body(send(&app, get("/", None)).await).await;
    let second = json_body(send(&app, get("/", None)).await).await;

    assert_eq!(first["title"], "Quote of the Day");
    assert_eq!(first["quote"]["text"], "A");
    assert_eq!(first["quote"]["author"], "B");
    assert_eq!(first["quote"]["id"], second["quote"]["id"]);
    assert!(first["favorites"].is_null());
    assert_eq!(app.source.random_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_index_upstream_failure_is_server_error() {
    let app = test_app_with(StubSource::failing());

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.status().is_server_error());
}

#[tokio::test]
async fn test_quotes_list_is_passthrough() {
    let app = test_app();

    let body = json_body(send(&app, get("/quotes/3", None)).await).await;
    assert_eq!(body["title"], "Quotes List");
    assert_eq!(body["quotes"]["page"], 3);
    assert_eq!(body["quotes"]["results"][0]["content"], "C");

    let body = json_body(send(&app, get("/quotes", None)).await).await;
    assert!(body["quotes"]["page"].is_null());
}

#[tokio::test]
async fn test_non_integer_quotes_page_is_rejected() {
    let app = test_app();

    for uri in ["/quotes/abc", "/quotes/-1", "/quotes/1.5"] {
        let response = send(&app, get(uri, None)).await;
        assert!(response.status().is_client_error(), "{} returned {}", uri, response.status());
    }
    assert_eq!(app.source.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unauthenticated_toggle_redirects_to_login_without_mutation() {
    let app = test_app();
    let quote_id = json_body(send(&app, get("/", None)).await).await["quote"]["id"]
        .as_i64()
        .unwrap();

    let response = send(&app, get(&format!("/{}", quote_id), None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/users/login?next=%2F{}", quote_id));

    let response = send(&app, get(&format!("/{}", quote_id), Some("not-a-token"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(&app, get("/favorites", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/users/login?next="));
}

#[tokio::test]
async fn test_toggle_adds_then_removes_favorite() {
    let app = test_app();
    let token = signed_in(&app, "ada").await;
    let quote_id = json_body(send(&app, get("/", Some(&token))).await).await["quote"]["id"]
        .as_i64()
        .unwrap();

    let response = send(&app, get(&format!("/{}?next=/favorites", quote_id), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/favorites");

    let body = json_body(send(&app, get("/favorites", Some(&token))).await).await;
    assert_eq!(body["title"], "Favorites");
    assert_eq!(body["page"]["total"], 1);
    assert_eq!(body["page"]["items"][0]["id"], quote_id);

    let index = json_body(send(&app, get("/", Some(&token))).await).await;
    assert_eq!(index["favorites"].as_array().unwrap().len(), 1);

    let response = send(&app, get(&format!("/{}", quote_id), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let body = json_body(send(&app, get("/favorites", Some(&token))).await).await;
    assert_eq!(body["page"]["total"], 0);
}

#[tokio::test]
async fn test_toggle_ignores_offsite_next() {
    let app = test_app();
    let token = signed_in(&app, "ada").await;
    let quote_id = json_body(send(&app, get("/", None)).await).await["quote"]["id"]
        .as_i64()
        .unwrap();

    let response = send(
        &app,
        get(&format!("/{}?next=https://evil.example/", quote_id), Some(&token)),
    )
    .await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_toggle_unknown_quote_is_not_found() {
    let app = test_app();
    let token = signed_in(&app, "ada").await;

    let response = send(&app, get("/4242", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_page_out_of_range_is_not_found() {
    let app = test_app();
    let token = signed_in(&app, "ada").await;

    let response = send(&app, get("/favorites?page=1", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/favorites?page=2", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_redirects_to_confirmation_page() {
    let app = test_app();

    let response = send(&app, post_json("/users/signup", signup_body("ada", "ada@example.com"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let confirm = location(&response);
    assert!(confirm.starts_with("/users/confirm_email/"));

    let body = json_body(send(&app, get(&confirm, None)).await).await;
    assert_eq!(body["title"], "Confirm email");
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["user"]["is_active"], false);
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_with_existing_email_is_rejected() {
    let app = test_app();
    send(&app, post_json("/users/signup", signup_body("ada", "ada@example.com"))).await;

    let response = send(&app, post_json("/users/signup", signup_body("charles", "ada@example.com"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Email already exists");
    assert!(app.store.find_user_by_username("charles").await.unwrap().is_none());
    assert_eq!(app.mailer.links.lock().await.len(), 1);
}

#[tokio::test]
async fn test_unverified_user_cannot_log_in() {
    let app = test_app();
    send(&app, post_json("/users/signup", signup_body("ada", "ada@example.com"))).await;

    let response = send(
        &app,
        post_json("/users/login", json!({"username": "ada", "password": "analytical42"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_confirm_email_for_unknown_user_is_not_found() {
    let app = test_app();

    let response = send(
        &app,
        get("/users/confirm_email/00000000-0000-0000-0000-000000000000", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_verification_token_is_rejected() {
    let app = test_app();

    let response = send(&app, get("/email/garbage", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = test_app();
    send(&app, get("/", None)).await;

    let response = send(&app, get("/metrics", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("qtable_quotes_created_total 1"));
    assert!(text.contains("qtable_http_responses_total"));
}

#[tokio::test]
async fn test_quote_store_is_shared_with_services() {
    let app = test_app();
    let body = json_body(send(&app, get("/", None)).await).await;
    let id = body["quote"]["id"].as_i64().unwrap();

    let stored = app.store.find_quote(id).await.unwrap().unwrap();
    assert_eq!(stored.text, "A");
}
