use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use petals_web::{AppConfig, AppState, MockAuthBackend, create_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(backend: MockAuthBackend) -> Router {
    let state = AppState {
        api: Arc::new(backend),
        config: AppConfig::default(),
    };
    create_router(state)
}

async fn post_json(
    app: Router,
    path: &str,
    payload: Value,
    cookie: Option<&str>,
) -> axum::response::Response {
    let mut request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.oneshot(request.body(Body::from(payload.to_string())).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect()
}

// --- Login ---

#[tokio::test]
async fn test_login_sets_cookies_and_redirects_admin_home() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/login",
        json!({ "email": "admin@petals.test", "password": "admin123" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    let token_cookie = cookies
        .iter()
        .find(|cookie| cookie.starts_with("auth_token="))
        .expect("auth_token cookie should be set");
    assert!(token_cookie.contains("HttpOnly"));
    assert!(token_cookie.contains("Path=/"));

    let profile_cookie = cookies
        .iter()
        .find(|cookie| cookie.starts_with("user_data="))
        .expect("user_data cookie should be set");
    assert!(!profile_cookie.contains("HttpOnly"));

    let body = body_to_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["redirectTo"], "/admin");
    assert_eq!(body["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn test_login_honors_safe_callback() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/login",
        json!({ "email": "user@petals.test", "password": "user123", "callbackUrl": "/cart" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response).await;
    assert_eq!(body["data"]["redirectTo"], "/cart");
}

#[tokio::test]
async fn test_login_ignores_offsite_callback() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/login",
        json!({
            "email": "user@petals.test",
            "password": "user123",
            "callbackUrl": "//evil.example/phish"
        }),
        None,
    )
    .await;

    let body = body_to_json(response).await;
    assert_eq!(body["data"]["redirectTo"], "/user/dashboard");
}

#[tokio::test]
async fn test_login_with_bad_password_is_rejected() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/login",
        json!({ "email": "user@petals.test", "password": "wrong" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());

    let body = body_to_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_when_api_unavailable() {
    let response = post_json(
        app(MockAuthBackend::new_failing()),
        "/api/session/login",
        json!({ "email": "user@petals.test", "password": "user123" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_to_json(response).await;
    assert_eq!(body["success"], false);
}

// --- Registration ---

#[tokio::test]
async fn test_register_signs_in_new_customer() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/register",
        json!({ "name": "Lily", "email": "lily@petals.test", "password": "tulips" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        set_cookies(&response)
            .iter()
            .any(|cookie| cookie.starts_with("auth_token="))
    );

    let body = body_to_json(response).await;
    assert_eq!(body["data"]["user"]["role"], "user");
    assert_eq!(body["data"]["user"]["name"], "Lily");
    assert_eq!(body["data"]["redirectTo"], "/user/dashboard");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/register",
        json!({ "name": "Copy", "email": "user@petals.test", "password": "x" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// --- Logout ---

#[tokio::test]
async fn test_logout_expires_both_cookies() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/logout",
        json!({}),
        Some(r#"auth_token=abc123; user_data={"role":"user"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    for name in ["auth_token=", "user_data="] {
        let cookie = cookies
            .iter()
            .find(|cookie| cookie.starts_with(name))
            .unwrap_or_else(|| panic!("{name} should be cleared"));
        assert!(cookie.contains("Max-Age=0"));
    }
}

#[tokio::test]
async fn test_logout_clears_cookies_even_if_api_fails() {
    let response = post_json(
        app(MockAuthBackend::new_failing()),
        "/api/session/logout",
        json!({}),
        Some("auth_token=abc123"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        set_cookies(&response)
            .iter()
            .any(|cookie| cookie.starts_with("auth_token="))
    );
}

// --- Session Snapshot ---

#[tokio::test]
async fn test_current_session_reports_cookie_state() {
    let request = Request::builder()
        .uri("/api/session")
        .header(header::COOKIE, r#"auth_token=abc123; user_data={"role":"admin","_id":"42"}"#)
        .body(Body::empty())
        .unwrap();

    let response = app(MockAuthBackend::new()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response).await;
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert_eq!(body["data"]["user"]["id"], "42");
}

#[tokio::test]
async fn test_current_session_without_cookies() {
    let request = Request::builder()
        .uri("/api/session")
        .body(Body::empty())
        .unwrap();

    let response = app(MockAuthBackend::new()).oneshot(request).await.unwrap();
    let body = body_to_json(response).await;
    assert_eq!(body["data"]["authenticated"], false);
    assert!(body["data"]["user"].is_null());
}

// --- Password Recovery ---

#[tokio::test]
async fn test_forgot_password_relays_message() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/forgot-password",
        json!({ "email": "user@petals.test" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("reset link"));
}

#[tokio::test]
async fn test_reset_password_with_empty_token_fails() {
    let response = post_json(
        app(MockAuthBackend::new()),
        "/api/session/reset-password",
        json!({ "token": "", "password": "new-secret" }),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
