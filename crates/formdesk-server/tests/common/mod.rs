#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use formdesk_core::MemoryStorage;
use formdesk_server::{AppState, ServerConfig, app};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const BOUNDARY: &str = "formdesk-test-boundary";

/// Router over in-memory storage, with the production middleware stack.
pub fn test_app() -> Router {
    test_app_with(ServerConfig::default())
}

pub fn test_app_with(config: ServerConfig) -> Router {
    let state = AppState::with_storage(config, Box::new(MemoryStorage::new()));
    app(Arc::new(state))
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: &serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a single multipart part named `field`.
pub async fn upload(
    app: Router,
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/forms/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// A one-page template with a single text field, in wire form.
pub fn sample_template(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": "テスト用",
        "pages": [{
            "pageNumber": 1,
            "fields": [{
                "id": "field_1",
                "fieldId": "field_1",
                "type": "text",
                "label": "氏名",
                "required": true,
                "style": {
                    "left": 100.0,
                    "top": 100.0,
                    "width": 200.0,
                    "height": 40.0,
                    "fontSize": 14.0,
                    "zIndex": 1000,
                    "backgroundColor": "#f9fafb",
                    "color": "#000000",
                    "borderColor": "#d1d5db"
                }
            }]
        }]
    })
}
