//! Integration tests for background uploads.

mod common;

use axum::http::{StatusCode, header};
use common::{body_bytes, body_json, get, test_app, test_app_with, upload};
use formdesk_server::ServerConfig;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

#[tokio::test]
async fn upload_then_download() {
    let app = test_app();
    let response = upload(app.clone(), "file", "scan 01.png", "image/png", PNG).await;
    assert_eq!(response.status(), StatusCode::OK);

    let url = body_json(response).await["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/api/forms/uploads/"));
    assert!(url.ends_with("-scan_01.png"));

    let response = get(app, &url).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(response).await, PNG);
}

#[tokio::test]
async fn uploads_get_distinct_names() {
    let app = test_app();
    let first = body_json(upload(app.clone(), "file", "bg.png", "image/png", PNG).await).await;
    let second = body_json(upload(app, "file", "bg.png", "image/png", PNG).await).await;
    assert_ne!(first["url"], second["url"]);
}

#[tokio::test]
async fn upload_path_is_sanitized() {
    let response = upload(test_app(), "file", "../../etc/passwd", "text/plain", b"x").await;
    let url = body_json(response).await["url"].as_str().unwrap().to_string();
    assert!(!url.contains(".."));
    assert!(url.ends_with("-passwd"));
}

#[tokio::test]
async fn missing_file_field_is_bad_request() {
    let response = upload(test_app(), "image", "bg.png", "image/png", PNG).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_upload_is_404() {
    let response = get(test_app(), "/api/forms/uploads/nothing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..Default::default()
    };
    let response = upload(test_app_with(config), "file", "big.png", "image/png", &[0; 1024]).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn full_upload_store_refuses_more() {
    let config = ServerConfig {
        upload_store_bytes: 2 * PNG.len(),
        ..Default::default()
    };
    let app = test_app_with(config);
    for _ in 0..2 {
        let response = upload(app.clone(), "file", "bg.png", "image/png", PNG).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = upload(app, "file", "bg.png", "image/png", PNG).await;
    assert_eq!(response.status(), StatusCode::INSUFFICIENT_STORAGE);
    assert_eq!(body_json(response).await["code"], "STORAGE_FULL");
}
