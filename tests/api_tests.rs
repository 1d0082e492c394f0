use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use microblog::config::Config;
use microblog::services::{Email, Mailer};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct CapturingMailer {
    sent: Mutex<Vec<Email>>,
}

#[async_trait::async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

fn test_config() -> Config {
    let db_path = std::env::temp_dir().join(format!("microblog-api-{}.db", Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}?mode=rwc", db_path.display());
    config.server.secure_cookies = false;
    config.security.secret_key = "test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.mail.reset_url_base = "http://test/reset_password".to_string();
    config
}

async fn spawn_app_with_mailer(mailer: Arc<CapturingMailer>) -> Router {
    let state = microblog::api::create_app_state_with_mailer(test_config(), mailer, None)
        .await
        .expect("Failed to create app state");
    microblog::api::router(state)
}

async fn spawn_app() -> Router {
    spawn_app_with_mailer(Arc::new(CapturingMailer::default())).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, set_cookie, json)
}

async fn register(app: &Router, username: &str) {
    let (status, _, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "cat",
            "password2": "cat",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {username}: {body}");
}

async fn login(app: &Router, username: &str) -> String {
    let (status, cookie, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": "cat" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {username}: {body}");
    cookie.expect("login should set a session cookie")
}

async fn post(app: &Router, cookie: &str, text: &str) {
    let (status, _, body) = send(
        app,
        "POST",
        "/api/posts",
        Some(cookie),
        Some(json!({ "body": text })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "post: {body}");
}

fn bodies(page: &Value) -> Vec<String> {
    page["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["body"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    for uri in ["/api/timeline", "/api/explore", "/api/auth/me", "/api/users/john"] {
        let (status, _, body) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["success"], false);
    }

    let (status, _, _) = send(&app, "GET", "/api/system/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_ready_checks_database() {
    let app = spawn_app().await;
    let (status, _, body) = send(&app, "GET", "/api/system/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ready"], true);
    assert_eq!(body["data"]["checks"]["database"], true);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = spawn_app().await;
    let request = Request::builder()
        .uri("/api/system/health/live")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn test_register_validation_and_conflicts() {
    let app = spawn_app().await;
    register(&app, "susan").await;

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "susan",
            "email": "other@example.com",
            "password": "cat",
            "password2": "cat",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "other",
            "email": "susan@example.com",
            "password": "cat",
            "password2": "cat",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "mismatch",
            "email": "mismatch@example.com",
            "password": "cat",
            "password2": "dog",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = spawn_app().await;
    register(&app, "susan").await;

    let (status, cookie, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "susan", "password": "dog" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());
}

#[tokio::test]
async fn test_follow_then_timeline() {
    let app = spawn_app().await;
    register(&app, "john").await;
    register(&app, "susan").await;

    let john = login(&app, "john").await;
    let susan = login(&app, "susan").await;

    post(&app, &susan, "post A").await;
    post(&app, &susan, "post B").await;

    // Before following, john's timeline is empty.
    let (status, _, page) = send(&app, "GET", "/api/timeline?page=1&per_page=10", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bodies(&page).is_empty());

    let (status, _, body) = send(&app, "POST", "/api/users/susan/follow", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["following"], true);
    assert_eq!(body["data"]["changed"], true);

    // Following twice is a no-op.
    let (status, _, body) = send(&app, "POST", "/api/users/susan/follow", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changed"], false);

    let (status, _, page) = send(&app, "GET", "/api/timeline?page=1&per_page=10", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bodies(&page), vec!["post B", "post A"]);
    assert_eq!(page["data"]["has_next"], false);
    assert_eq!(page["data"]["has_prev"], false);
    assert_eq!(page["data"]["page"], 1);
    assert_eq!(page["data"]["total"], 2);
    assert_eq!(page["data"]["items"][0]["author"], "susan");

    let (status, _, profile) = send(&app, "GET", "/api/users/susan", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["data"]["followers"], 1);
    assert_eq!(profile["data"]["posts"], 2);
    assert_eq!(profile["data"]["is_following"], true);
    assert_eq!(profile["data"]["is_me"], false);
    assert!(profile["data"]["user"].get("email").is_none());

    let (_, _, followers) = send(&app, "GET", "/api/users/susan/followers", Some(&john), None).await;
    assert_eq!(followers["data"][0]["username"], "john");

    let (status, _, _) = send(&app, "POST", "/api/users/susan/unfollow", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, page) = send(&app, "GET", "/api/timeline", Some(&john), None).await;
    assert!(bodies(&page).is_empty());
}

#[tokio::test]
async fn test_explore_shows_everyone() {
    let app = spawn_app().await;
    register(&app, "john").await;
    register(&app, "susan").await;
    let john = login(&app, "john").await;
    let susan = login(&app, "susan").await;

    post(&app, &john, "from john").await;
    post(&app, &susan, "from susan").await;

    let (status, _, page) = send(&app, "GET", "/api/explore", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bodies(&page), vec!["from susan", "from john"]);

    let (status, _, page) = send(&app, "GET", "/api/users/john/posts", Some(&susan), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bodies(&page), vec!["from john"]);
}

#[tokio::test]
async fn test_self_follow_rejected() {
    let app = spawn_app().await;
    register(&app, "john").await;
    let john = login(&app, "john").await;

    let (status, _, body) = send(&app, "POST", "/api/users/john/follow", Some(&john), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "You cannot follow yourself");

    let (status, _, body) = send(&app, "POST", "/api/users/john/unfollow", Some(&john), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You cannot unfollow yourself");
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = spawn_app().await;
    register(&app, "john").await;
    let john = login(&app, "john").await;

    for (method, uri) in [
        ("POST", "/api/users/nobody/follow"),
        ("POST", "/api/users/nobody/unfollow"),
        ("GET", "/api/users/nobody"),
        ("GET", "/api/users/nobody/posts"),
        ("GET", "/api/users/nobody/followers"),
    ] {
        let (status, _, _) = send(&app, method, uri, Some(&john), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_invalid_page_arguments() {
    let app = spawn_app().await;
    register(&app, "john").await;
    let john = login(&app, "john").await;

    for uri in [
        "/api/timeline?page=0",
        "/api/timeline?page=-3",
        "/api/explore?per_page=0",
        "/api/explore?per_page=1000",
    ] {
        let (status, _, body) = send(&app, "GET", uri, Some(&john), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false);
    }

    // Past the end is an empty page, not an error.
    let (status, _, page) = send(&app, "GET", "/api/explore?page=9", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bodies(&page).is_empty());
    assert_eq!(page["data"]["has_prev"], true);
    assert_eq!(page["data"]["has_next"], false);
}

#[tokio::test]
async fn test_post_validation() {
    let app = spawn_app().await;
    register(&app, "john").await;
    let john = login(&app, "john").await;

    let (status, _, _) = send(&app, "POST", "/api/posts", Some(&john), Some(json!({ "body": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_long = "x".repeat(141);
    let (status, _, _) = send(&app, "POST", "/api/posts", Some(&john), Some(json!({ "body": too_long }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_profile() {
    let app = spawn_app().await;
    register(&app, "john").await;
    register(&app, "susan").await;
    let john = login(&app, "john").await;

    let (status, _, body) = send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&john),
        Some(json!({ "username": "john", "about_me": "hello there" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["about_me"], "hello there");

    let (status, _, _) = send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&john),
        Some(json!({ "username": "susan" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, body) = send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&john),
        Some(json!({ "username": "johnny" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "johnny");
    assert!(body["data"]["about_me"].is_null());

    let (status, _, me) = send(&app, "GET", "/api/auth/me", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["username"], "johnny");
    assert!(me["data"]["last_seen"].is_string());
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = spawn_app().await;
    register(&app, "john").await;
    let john = login(&app, "john").await;

    let (status, _, _) = send(&app, "POST", "/api/auth/logout", Some(&john), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&app, "GET", "/api/auth/me", Some(&john), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let mailer = Arc::new(CapturingMailer::default());
    let app = spawn_app_with_mailer(mailer.clone()).await;
    register(&app, "susan").await;

    // Unknown addresses get the same answer and no mail.
    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/reset-password/request",
        None,
        Some(json!({ "email": "nobody@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(mailer.sent.lock().unwrap().is_empty());

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/reset-password/request",
        None,
        Some(json!({ "email": "susan@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = {
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "susan@example.com");
        let link = sent[0]
            .body
            .lines()
            .find_map(|line| line.trim().strip_prefix("http://test/reset_password/"))
            .expect("reset link in mail body")
            .to_string();
        link
    };

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": "garbage", "password": "dog", "password2": "dog" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The password reset link is invalid");

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "token": token, "password": "dog", "password2": "dog" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "susan", "password": "cat" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "susan", "password": "dog" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
