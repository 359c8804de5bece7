//! Integration tests for role permissions on resource routes.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{TestApp, unique_email};
use klink_auth::rbac::enforcer::FORBIDDEN;

#[tokio::test]
async fn test_customer_can_browse_products() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let admin = app.admin_token().await;
    let category = app.create_category(&admin, "Browse").await;
    let user = app.user_token().await;

    let products = app.request("GET", "/api/v1/products", None, Some(&user)).await;
    assert_eq!(products.status, StatusCode::OK);

    let details = app
        .request("GET", &format!("/api/v1/categories/{category}"), None, Some(&user))
        .await;
    assert_eq!(details.status, StatusCode::OK);
    assert_eq!(details.body["data"]["name"], "Browse");
}

#[tokio::test]
async fn test_customer_cannot_write_catalogue() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.user_token().await;

    let response = app
        .request(
            "POST",
            "/api/v1/categories",
            Some(json!({ "name": "Sneaky" })),
            Some(&user),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["status"], "fail");
    assert_eq!(response.message(), FORBIDDEN);
}

#[tokio::test]
async fn test_customer_cannot_manage_accounts() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.user_token().await;

    for path in ["/api/v1/users", "/api/v1/roles", "/api/v1/permissions"] {
        let response = app.request("GET", path, None, Some(&user)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
    }
}

#[tokio::test]
async fn test_admin_manages_roles() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let admin = app.admin_token().await;

    let permissions = app
        .request(
            "GET",
            "/api/v1/permissions?key=product&action=list",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(permissions.status, StatusCode::OK);
    assert_eq!(permissions.body["result"], 1);
    let permission_id = permissions.body["data"][0]["id"].as_str().unwrap().to_string();

    let created = app
        .request(
            "POST",
            "/api/v1/roles",
            Some(json!({
                "name": "Viewer",
                "type": "viewer",
                "description": "Read-only catalogue access",
                "permission_ids": [permission_id],
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.body["data"]["permissions"][0]["key"], "product");
    let role_id = created.id();

    // A permission in use by a role cannot be removed.
    let blocked = app
        .request(
            "DELETE",
            &format!("/api/v1/permissions/{permission_id}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);

    let deleted = app
        .request("DELETE", &format!("/api/v1/roles/{role_id}"), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_role_held_by_user_cannot_be_deleted() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let admin = app.admin_token().await;

    let role = app
        .request(
            "POST",
            "/api/v1/roles",
            Some(json!({ "name": "Staff", "type": "staff" })),
            Some(&admin),
        )
        .await;
    assert_eq!(role.status, StatusCode::CREATED, "{:?}", role.body);
    let role_id = role.id();

    let user = app
        .request(
            "POST",
            "/api/v1/users",
            Some(json!({
                "name": "Staff Member",
                "email": unique_email("staff"),
                "password": "password123",
                "password_confirm": "password123",
                "role_id": role_id,
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(user.status, StatusCode::CREATED, "{:?}", user.body);
    let user_id = user.id();

    let blocked = app
        .request("DELETE", &format!("/api/v1/roles/{role_id}"), None, Some(&admin))
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);
    assert_eq!(blocked.message(), "Already applied. Could not be deleted.");

    let removed = app
        .request("DELETE", &format!("/api/v1/users/{user_id}"), None, Some(&admin))
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let deleted = app
        .request("DELETE", &format!("/api/v1/roles/{role_id}"), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_role_rejects_unknown_permissions() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let admin = app.admin_token().await;
    let missing = uuid::Uuid::new_v4();

    let created = app
        .request(
            "POST",
            "/api/v1/roles",
            Some(json!({
                "name": "Ghost",
                "type": "ghost",
                "permission_ids": [missing],
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST, "{:?}", created.body);
    assert_eq!(created.message(), "Invalid reference: permission_ids");

    let role = app
        .request(
            "POST",
            "/api/v1/roles",
            Some(json!({ "name": "Ghost", "type": "ghost" })),
            Some(&admin),
        )
        .await;
    assert_eq!(role.status, StatusCode::CREATED, "{:?}", role.body);
    let role_id = role.id();

    let updated = app
        .request(
            "PATCH",
            &format!("/api/v1/roles/{role_id}"),
            Some(json!({ "permission_ids": [missing] })),
            Some(&admin),
        )
        .await;
    assert_eq!(updated.status, StatusCode::BAD_REQUEST);
    assert_eq!(updated.message(), "Invalid reference: permission_ids");

    let unchanged = app
        .request("GET", &format!("/api/v1/roles/{role_id}"), None, Some(&admin))
        .await;
    assert_eq!(unchanged.status, StatusCode::OK);
    assert_eq!(unchanged.body["data"]["permission_ids"], json!([]));
}

#[tokio::test]
async fn test_admin_lists_users_without_secrets() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let admin = app.admin_token().await;

    let response = app
        .request("GET", "/api/v1/users?limit=5", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let users = response.body["data"].as_array().unwrap();
    assert!(!users.is_empty());
    for user in users {
        assert!(user.get("password_hash").is_none());
        assert!(user.get("password_reset_token").is_none());
    }
}
