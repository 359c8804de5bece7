//! Integration tests for uploads and signed storage links.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};

use helpers::{TestApp, TestResponse};

const BOUNDARY: &str = "klink-test-boundary";

/// Build a multipart body from `(field, file name, content)` triples.
fn multipart(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &TestApp, token: &str, parts: &[(&str, &str, &[u8])]) -> TestResponse {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/files")
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart(parts)))
        .unwrap();
    app.send(req).await
}

#[tokio::test]
async fn test_upload_and_fetch_signed_link() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.user_token().await;

    let response = upload(&app, &token, &[("resume", "cv.pdf", b"%PDF-1.4 test".as_slice())]).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let doc = &response.body["data"][0];
    assert_eq!(doc["folder"], "resumes");
    assert_eq!(doc["original_name"], "cv.pdf");
    assert_eq!(doc["mime_type"], "application/octet-stream");

    let url = doc["url"].as_str().expect("signed url");
    let path = url
        .strip_prefix(&app.config.storage.local.public_base_url)
        .expect("url under public base");
    assert!(path.starts_with("/storage/resumes/"));

    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    let fetched = app.send(req).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.raw, b"%PDF-1.4 test");

    let tampered = format!("{path}0");
    let req = Request::builder().uri(tampered).body(Body::empty()).unwrap();
    assert_eq!(app.send(req).await.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upload_rejects_wrong_extension() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.user_token().await;

    let response = upload(&app, &token, &[("image", "notes.pdf", b"not an image".as_slice())]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = upload(&app, &token, &[("avatar", "me.png", b"data".as_slice())]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_files() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.user_token().await;

    let response = upload(&app, &token, &[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Please upload files");
}

#[tokio::test]
async fn test_files_are_private_to_owner() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let owner = app.user_token().await;
    let other = app.user_token().await;

    let response = upload(&app, &owner, &[("cover-letter", "letter.docx", b"hello".as_slice())]).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let id = response.body["data"][0]["id"].as_str().unwrap().to_string();

    let mine = app.request("GET", "/api/v1/files", None, Some(&owner)).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["result"], 1);

    let theirs = app
        .request("GET", &format!("/api/v1/files/{id}"), None, Some(&other))
        .await;
    assert_eq!(theirs.status, StatusCode::NOT_FOUND);

    let deleted = app
        .request("DELETE", &format!("/api/v1/files/{id}"), None, Some(&owner))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let empty = app.request("GET", "/api/v1/files", None, Some(&owner)).await;
    assert_eq!(empty.body["result"], 0);
}

#[tokio::test]
async fn test_failed_upload_stores_nothing() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let token = app.user_token().await;

    let response = upload(
        &app,
        &token,
        &[
            ("resume", "cv.pdf", b"%PDF-1.4 test".as_slice()),
            ("image", "broken.png", b"definitely not a png".as_slice()),
        ],
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", response.body);

    let mine = app.request("GET", "/api/v1/files", None, Some(&token)).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["result"], 0);
    assert!(!app.storage_dir.path().join("resumes").exists());
}
