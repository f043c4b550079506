//! HTTP-level integration tests for the multipart file upload endpoint.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router,
//! with the upload directory pointed at a temp dir so written bytes can be
//! inspected and cleaned up.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{auth_token, body_json, build_test_app};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "workplan-test-boundary";

/// Build a multipart/form-data body with a single part.
fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n")
                .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"\r\n").as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a POST /api/v1/files request carrying the given multipart body.
fn upload_request(body: Vec<u8>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/files")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

// ---------------------------------------------------------------------------
// Test: happy path writes the bytes and records a metadata row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_writes_file_and_creates_row(pool: PgPool) {
    let upload_dir = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, upload_dir.path());
    let token = auth_token();

    let content = b"quarterly progress report";
    let request = upload_request(
        multipart_body("file", Some("report.pdf"), content),
        Some(&token),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["code"], 201);
    assert_eq!(json["data"]["file_name"], "report.pdf");

    // The stored path lives under the configured upload dir, with a unique
    // prefix ahead of the original name.
    let file_path = json["data"]["file_path"].as_str().unwrap();
    assert!(file_path.starts_with(upload_dir.path().to_str().unwrap()));
    assert!(file_path.ends_with("_report.pdf"));
    assert_ne!(
        file_path,
        upload_dir.path().join("report.pdf").to_str().unwrap()
    );

    // The bytes on disk match what was sent.
    let written = std::fs::read(file_path).unwrap();
    assert_eq!(written, content);
}

// ---------------------------------------------------------------------------
// Test: two uploads of the same name never collide on disk
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_upload_of_same_name_gets_distinct_paths(pool: PgPool) {
    let upload_dir = tempfile::tempdir().unwrap();
    let token = auth_token();

    let mut paths = Vec::new();
    for content in [&b"first"[..], &b"second"[..]] {
        let app = build_test_app(pool.clone(), upload_dir.path());
        let request = upload_request(
            multipart_body("file", Some("notes.txt"), content),
            Some(&token),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        paths.push(json["data"]["file_path"].as_str().unwrap().to_string());
    }

    assert_ne!(paths[0], paths[1]);
    assert_eq!(std::fs::read(&paths[0]).unwrap(), b"first");
    assert_eq!(std::fs::read(&paths[1]).unwrap(), b"second");
}

// ---------------------------------------------------------------------------
// Test: a multipart body without a 'file' part is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_without_file_field_is_rejected(pool: PgPool) {
    let upload_dir = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, upload_dir.path());
    let token = auth_token();

    let request = upload_request(multipart_body("notes", None, b"not a file"), Some(&token));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], 400);
    assert_eq!(json["data"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Test: an empty file part is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_of_empty_file_is_rejected(pool: PgPool) {
    let upload_dir = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, upload_dir.path());
    let token = auth_token();

    let request = upload_request(
        multipart_body("file", Some("empty.bin"), b""),
        Some(&token),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Uploaded file is empty");
}

// ---------------------------------------------------------------------------
// Test: upload requires authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_without_token_is_unauthorized(pool: PgPool) {
    let upload_dir = tempfile::tempdir().unwrap();
    let app = build_test_app(pool, upload_dir.path());

    let request = upload_request(multipart_body("file", Some("report.pdf"), b"data"), None);
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
