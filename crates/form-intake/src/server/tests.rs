use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use super::build_router;
use super::state::AppState;
use crate::config::IntakeConfig;
use crate::providers::SqliteSubmissionStore;
use crate::types::Submission;

const BOUNDARY: &str = "----intake-test-boundary";

struct TestApp {
    router: Router,
    _dir: TempDir,
    upload_dir: std::path::PathBuf,
}

fn test_app() -> TestApp {
    test_app_with(|_| {})
}

fn test_app_with(configure: impl FnOnce(&mut IntakeConfig)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let upload_dir = dir.path().join("uploads");

    let mut config = IntakeConfig::default();
    config.storage.upload_dir = upload_dir.clone();
    configure(&mut config);

    let store = Arc::new(SqliteSubmissionStore::in_memory().unwrap());
    let state = AppState::with_store(config, store);

    TestApp {
        router: build_router(state),
        _dir: dir,
        upload_dir,
    }
}

/// Multipart part: (field, filename for file parts, bytes)
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        field, filename
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn submit(app: &TestApp, parts: &[Part<'_>]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/submit")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get(app: &TestApp, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

async fn list(app: &TestApp) -> Vec<Submission> {
    let response = get(app, "/api/submissions").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn text<'a>(field: &'a str, value: &'a str) -> Part<'a> {
    (field, None, value.as_bytes())
}

fn file<'a>(field: &'a str, filename: &'a str, data: &'a [u8]) -> Part<'a> {
    (field, Some(filename), data)
}

fn person(name: &str) -> Vec<Part<'_>> {
    vec![
        text("name", name),
        text("email", "jo@x.com"),
        text("phone", "555-1234"),
    ]
}

#[tokio::test]
async fn test_submit_then_list() {
    let app = test_app();

    let mut parts = person("Jo Lee");
    parts.push(file("documents", "cv.pdf", b"%PDF-1.4"));
    parts.push(file("images", "me.png", &[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff]));

    let (status, body) = submit(&app, &parts).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "success": true }));

    let submissions = list(&app).await;
    assert_eq!(submissions.len(), 1);

    let sub = &submissions[0];
    assert_eq!(sub.id, 1);
    assert_eq!(sub.name, "Jo Lee");
    assert_eq!(sub.email, "jo@x.com");
    assert_eq!(sub.phone, "555-1234");
    assert_eq!(sub.documents.len(), 1);
    assert_eq!(sub.images.len(), 1);
    assert!(sub.documents[0].ends_with("_cv.pdf"));
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let app = test_app();

    let parts = vec![
        text("name", "Jo Lee"),
        text("email", "jo@x.com"),
        text("phone", ""),
        file("documents", "cv.pdf", b"%PDF"),
    ];

    let (status, body) = submit(&app, &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "All fields are required");

    assert!(list(&app).await.is_empty());
    assert!(!app.upload_dir.exists() || std::fs::read_dir(&app.upload_dir).unwrap().next().is_none());
}

#[tokio::test]
async fn test_absent_field_rejected() {
    let app = test_app();
    let parts = vec![text("name", "Jo Lee"), text("email", "jo@x.com")];

    let (status, _) = submit(&app, &parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = test_app_with(|config| config.server.max_upload_size = 1024);

    let big = vec![b'x'; 8 * 1024];
    let mut parts = person("Jo Lee");
    parts.push(file("documents", "big.txt", &big));

    let (status, body) = submit(&app, &parts).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "payload_too_large");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_gets_json_error() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/submit")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Jo Lee"}"#))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["type"], "multipart_error");
}

#[tokio::test]
async fn test_empty_file_inputs_skipped() {
    let app = test_app();

    let mut parts = person("Ann");
    parts.push(file("documents", "", b""));
    parts.push(file("images", "", b""));

    let (status, _) = submit(&app, &parts).await;
    assert_eq!(status, StatusCode::OK);

    let sub = &list(&app).await[0];
    assert!(sub.documents.is_empty());
    assert!(sub.images.is_empty());
}

#[tokio::test]
async fn test_ids_follow_creation_order() {
    let app = test_app();

    for name in ["First", "Second", "Third"] {
        let (status, _) = submit(&app, &person(name)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let submissions = list(&app).await;
    let names: Vec<_> = submissions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);
    assert!(submissions.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_download_round_trips_bytes() {
    let app = test_app();
    let png: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x80, 0xfe];

    let mut parts = person("Jo Lee");
    parts.push(file("images", "me.png", png));
    submit(&app, &parts).await;

    let stored = list(&app).await[0].images[0].clone();
    let response = get(&app, &format!("/api/download?file={}", stored)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"{}\"", stored).as_str()
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], png);
}

#[tokio::test]
async fn test_download_errors() {
    let app = test_app();

    let response = get(&app, "/api/download?file=1700000000000_never.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/api/download").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/download?file=..%2Fsecret.txt").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_archive_route() {
    let app = test_app();

    let mut parts = person("Jo Lee");
    parts.push(file("documents", "cv.pdf", b"%PDF"));
    parts.push(file("images", "me.png", b"PNG"));
    submit(&app, &parts).await;

    let response = get(&app, "/api/submissions/1/archive").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Jo Lee_submission.zip\""
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(body.to_vec())).unwrap();
    let names: Vec<_> = archive.file_names().collect();
    assert!(names.iter().any(|n| n.starts_with("Jo_Lee/documents/") && n.ends_with("_cv.pdf")));
    assert!(names.iter().any(|n| n.starts_with("Jo_Lee/images/") && n.ends_with("_me.png")));

    let response = get(&app, "/api/submissions/99/archive").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_archive_aborts_on_missing_file() {
    let app = test_app();

    let mut parts = person("Jo Lee");
    parts.push(file("documents", "cv.pdf", b"%PDF"));
    submit(&app, &parts).await;

    let stored = list(&app).await[0].documents[0].clone();
    std::fs::remove_file(app.upload_dir.join(&stored)).unwrap();

    let response = get(&app, "/api/submissions/1/archive").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], format!("Failed to fetch {}", stored));
}

#[tokio::test]
async fn test_uploads_served_with_cache_header() {
    let app = test_app();

    let mut parts = person("Jo Lee");
    parts.push(file("documents", "notes.txt", b"hello"));
    submit(&app, &parts).await;

    let stored = list(&app).await[0].documents[0].clone();
    let response = get(&app, &format!("/uploads/{}", stored)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
}

#[tokio::test]
async fn test_pages_render() {
    let app = test_app();
    submit(&app, &person("Jo Lee")).await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("Personal Details Form"));

    let response = get(&app, "/admin").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Jo Lee"));
    assert!(html.contains("1 submissions"));
}

#[tokio::test]
async fn test_health_and_ready() {
    let app = test_app();
    assert_eq!(get(&app, "/health").await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/ready").await.status(), StatusCode::OK);
}
