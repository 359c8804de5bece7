//! Integration tests for sign-up, login, and the password flows.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use helpers::{TestApp, unique_email};
use klink_auth::password::ResetToken;
use klink_service::auth::service::{PASSWORD_CHANGED, USER_GONE};

#[tokio::test]
async fn test_signup_sets_token_and_cookie() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("signup");

    let response = app
        .request(
            "POST",
            "/api/v1/auth/signup/user",
            Some(json!({
                "name": "New Customer",
                "email": email,
                "password": "password123",
                "password_confirm": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "success");
    assert!(!response.token().is_empty());
    assert_eq!(response.body["data"]["email"], email.as_str());
    assert!(response.body["data"].get("password_hash").is_none());
    assert_eq!(response.body["data"]["role"]["type"], "user");

    let cookie = response.set_cookie.expect("token cookie");
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_signup_password_mismatch() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app
        .request(
            "POST",
            "/api/v1/auth/signup/user",
            Some(json!({
                "name": "Mismatch",
                "email": unique_email("mismatch"),
                "password": "password123",
                "password_confirm": "password124",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "fail");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("dup");
    app.signup("user", &email).await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/signup/user",
            Some(json!({
                "name": "Again",
                "email": email,
                "password": "password123",
                "password_confirm": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.message().contains("email"));
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("login");
    app.signup("user", &email).await;

    let ok = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(!ok.token().is_empty());

    let wrong = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": "wrongpassword" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.message(), "Incorrect email or password");

    let missing = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": email })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.message(), "Please provide email and password");
}

#[tokio::test]
async fn test_me_with_bearer_and_cookie() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("me");
    let token = app.signup("user", &email).await;

    let bearer = app.request("GET", "/api/v1/auth/me", None, Some(&token)).await;
    assert_eq!(bearer.status, StatusCode::OK);
    assert_eq!(bearer.body["data"]["email"], email.as_str());

    let req = Request::builder()
        .uri("/api/v1/auth/me")
        .header("cookie", format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let cookie = app.send(req).await;
    assert_eq!(cookie.status, StatusCode::OK);
    assert_eq!(cookie.body["data"]["email"], email.as_str());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app.request("POST", "/api/v1/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Logged out successfully");
    let cookie = response.set_cookie.expect("removal cookie");
    assert!(cookie.starts_with("token="));
}

#[tokio::test]
async fn test_update_me_rejects_password() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.user_token().await;

    let rejected = app
        .request(
            "PATCH",
            "/api/v1/auth/update-me",
            Some(json!({ "password": "password999" })),
            Some(&token),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);

    let renamed = app
        .request(
            "PATCH",
            "/api/v1/auth/update-me",
            Some(json!({ "name": "Renamed" })),
            Some(&token),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["name"], "Renamed");
}

#[tokio::test]
async fn test_change_password() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("change");
    let token = app.signup("user", &email).await;

    let wrong = app
        .request(
            "PATCH",
            "/api/v1/auth/change-password",
            Some(json!({
                "password": "not-the-password",
                "new_password": "password456",
                "password_confirm": "password456",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let changed = app
        .request(
            "PATCH",
            "/api/v1/auth/change-password",
            Some(json!({
                "password": "password123",
                "new_password": "password456",
                "password_confirm": "password456",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK, "{:?}", changed.body);

    let login = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": "password456" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("gone");
    let token = app.signup("user", &email).await;

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let response = app.request("GET", "/api/v1/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), USER_GONE);
}

#[tokio::test]
async fn test_token_issued_before_password_change_is_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("stale");
    let token = app.signup("user", &email).await;

    let before = app.request("GET", "/api/v1/auth/me", None, Some(&token)).await;
    assert_eq!(before.status, StatusCode::OK);

    // Tokens carry whole-second `iat`, so move the change clearly past it.
    sqlx::query(
        "UPDATE users SET password_changed_at = NOW() + INTERVAL '1 minute' WHERE email = $1",
    )
    .bind(&email)
    .execute(&app.db_pool)
    .await
    .unwrap();

    let response = app.request("GET", "/api/v1/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), PASSWORD_CHANGED);

    let login = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_and_reset_password() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let email = unique_email("reset");
    app.signup("user", &email).await;

    let unknown = app
        .request(
            "POST",
            "/api/v1/auth/forgot-password",
            Some(json!({ "email": unique_email("nobody") })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let sent = app
        .request(
            "POST",
            "/api/v1/auth/forgot-password",
            Some(json!({ "email": email })),
            None,
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    assert_eq!(sent.message(), "Token sent to email!");

    // The mailed token is never stored, so plant a known one.
    let token = ResetToken::generate();
    sqlx::query(
        "UPDATE users SET password_reset_token = $1, \
         password_reset_expires = NOW() + INTERVAL '10 minutes' WHERE email = $2",
    )
    .bind(&token.digest)
    .bind(&email)
    .execute(&app.db_pool)
    .await
    .unwrap();

    let reset = app
        .request(
            "PATCH",
            &format!("/api/v1/auth/reset-password/{}", token.raw),
            Some(json!({
                "password": "password789",
                "password_confirm": "password789",
            })),
            None,
        )
        .await;
    assert_eq!(reset.status, StatusCode::OK, "{:?}", reset.body);
    assert!(!reset.token().is_empty());

    let reused = app
        .request(
            "PATCH",
            &format!("/api/v1/auth/reset-password/{}", token.raw),
            Some(json!({
                "password": "password000",
                "password_confirm": "password000",
            })),
            None,
        )
        .await;
    assert_eq!(reused.status, StatusCode::BAD_REQUEST);
    assert_eq!(reused.message(), "Token is invalid or has expired");
}

#[tokio::test]
async fn test_rate_limit_applies_to_api() {
    let Some(app) = TestApp::try_with_config(|config| {
        config.server.rate_limit.enabled = true;
        config.server.rate_limit.max_requests = 2;
    })
    .await
    else {
        return;
    };

    for _ in 0..2 {
        let response = app.request("GET", "/api/v1/products", None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    let limited = app.request("GET", "/api/v1/products", None, None).await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);

    let root = app.request("GET", "/", None, None).await;
    assert_eq!(root.status, StatusCode::OK);
}
