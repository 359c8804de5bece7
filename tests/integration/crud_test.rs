//! Integration tests for the generic resource routes and the list query syntax.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::TestApp;

async fn create_product(app: &TestApp, token: &str, category: &str, name: &str, price: f64) -> String {
    let response = app
        .request(
            "POST",
            "/api/v1/products",
            Some(json!({ "name": name, "category_id": category, "price": price })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.id()
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|doc| doc["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_product_lifecycle() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.admin_token().await;
    let category = app.create_category(&token, "Lifecycle").await;
    let id = create_product(&app, &token, &category, "Kettle", 25.0).await;

    let details = app
        .request("GET", &format!("/api/v1/products/{id}"), None, Some(&token))
        .await;
    assert_eq!(details.status, StatusCode::OK);
    assert_eq!(details.body["data"]["name"], "Kettle");
    assert_eq!(details.body["data"]["price"], 25.0);

    let updated = app
        .request(
            "PATCH",
            &format!("/api/v1/products/{id}"),
            Some(json!({ "price": 30.5 })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["price"], 30.5);
    assert_eq!(updated.body["data"]["name"], "Kettle");

    let deleted = app
        .request("DELETE", &format!("/api/v1/products/{id}"), None, Some(&token))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app
        .request("GET", &format!("/api/v1/products/{id}"), None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.message(), "No document found with that ID");
}

#[tokio::test]
async fn test_list_filter_sort_and_paginate() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.admin_token().await;
    let category = app.create_category(&token, "Listing").await;
    for (name, price) in [("Alpha", 5.0), ("Bravo", 15.0), ("Charlie", 25.0), ("Delta", 35.0)] {
        create_product(&app, &token, &category, name, price).await;
    }

    let filtered = app
        .request(
            "GET",
            &format!("/api/v1/products?category_id={category}&price%5Bgte%5D=15&sort=-price"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(filtered.status, StatusCode::OK, "{:?}", filtered.body);
    assert_eq!(filtered.body["status"], "success");
    assert_eq!(filtered.body["result"], 3);
    assert_eq!(names(&filtered.body), ["Delta", "Charlie", "Bravo"]);
    assert_eq!(filtered.body["pagination"]["total"], 3);

    let paged = app
        .request(
            "GET",
            &format!("/api/v1/products?category_id={category}&sort=price&page=2&limit=3"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(paged.status, StatusCode::OK);
    assert_eq!(names(&paged.body), ["Delta"]);
    assert_eq!(paged.body["pagination"]["page"], 2);
    assert_eq!(paged.body["pagination"]["total_pages"], 2);
    assert!(paged.body["pagination"]["prev"].is_object());
    assert!(paged.body["pagination"].get("next").is_none());
}

#[tokio::test]
async fn test_field_projection() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.admin_token().await;
    let category = app.create_category(&token, "Projection").await;
    create_product(&app, &token, &category, "Lamp", 12.0).await;

    let response = app
        .request(
            "GET",
            &format!("/api/v1/products?category_id={category}&fields=name"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let doc = &response.body["data"][0];
    assert_eq!(doc["name"], "Lamp");
    assert!(doc.get("price").is_none());
}

#[tokio::test]
async fn test_unknown_filter_operator() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.admin_token().await;

    let response = app
        .request("GET", "/api/v1/products?price%5Bregex%5D=1", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "fail");
}

#[tokio::test]
async fn test_validation_errors() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.admin_token().await;
    let category = app.create_category(&token, "Validation").await;

    let negative = app
        .request(
            "POST",
            "/api/v1/products",
            Some(json!({ "name": "Bad", "category_id": category, "price": -1.0 })),
            Some(&token),
        )
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);
    assert!(negative.message().contains("Price must not be negative"));

    let bad_id = app
        .request("GET", "/api/v1/products/not-a-uuid", None, Some(&token))
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.message(), "Invalid id: not-a-uuid");

    let missing = app
        .request(
            "GET",
            &format!("/api/v1/categories/{}", uuid::Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_referenced_category_cannot_be_deleted() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.admin_token().await;
    let category = app.create_category(&token, "Guarded").await;
    let product = create_product(&app, &token, &category, "Anchor", 1.0).await;

    let blocked = app
        .request("DELETE", &format!("/api/v1/categories/{category}"), None, Some(&token))
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);
    assert_eq!(blocked.message(), "Already applied. Could not be deleted.");

    app.request("DELETE", &format!("/api/v1/products/{product}"), None, Some(&token))
        .await;
    let freed = app
        .request("DELETE", &format!("/api/v1/categories/{category}"), None, Some(&token))
        .await;
    assert_eq!(freed.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_products_populate_category() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.admin_token().await;
    let category = app.create_category(&token, "Populated").await;
    let id = create_product(&app, &token, &category, "Mug", 8.0).await;

    let response = app
        .request(
            "GET",
            &format!("/api/v1/products/{id}?populate=category"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["category"]["name"], "Populated");
}
