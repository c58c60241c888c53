//! Integration tests for the template routes.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, delete, get, sample_template, send_json, test_app};
use serde_json::json;

async fn create(app: axum::Router, name: &str) -> serde_json::Value {
    let response = send_json(app, Method::POST, "/api/forms/templates", &sample_template(name)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn health_returns_ok() {
    let response = get(test_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn create_assigns_id_and_round_trips() {
    let app = test_app();
    let created = create(app.clone(), "申込書").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["pages"][0]["fields"][0]["label"], "氏名");

    let response = get(app, &format!("/api/forms/templates/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn create_ignores_client_id() {
    let app = test_app();
    let mut body = sample_template("x");
    body["id"] = json!("chosen-by-client");
    let response = send_json(app, Method::POST, "/api/forms/templates", &body).await;
    let created = body_json(response).await;
    assert_ne!(created["id"], "chosen-by-client");
}

#[tokio::test]
async fn list_is_sorted_by_name() {
    let app = test_app();
    create(app.clone(), "見積書").await;
    create(app.clone(), "Alpha").await;

    let response = get(app, "/api/forms/templates").await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Alpha", "見積書"]);
    assert_eq!(list[0]["pageCount"], 1);
}

#[tokio::test]
async fn update_replaces_template() {
    let app = test_app();
    let created = create(app.clone(), "v1").await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/forms/templates/{id}");

    let mut changed = created.clone();
    changed["name"] = json!("v2");
    changed["pages"][0]["fields"][0]["style"]["left"] = json!(150.0);
    let response = send_json(app.clone(), Method::PUT, &uri, &changed).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(get(app, &uri).await).await;
    assert_eq!(fetched["name"], "v2");
    assert_eq!(fetched["pages"][0]["fields"][0]["style"]["left"], 150.0);
}

#[tokio::test]
async fn update_missing_is_404() {
    let response = send_json(
        test_app(),
        Method::PUT,
        "/api/forms/templates/missing",
        &sample_template("x"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn get_missing_is_404_json() {
    let response = get(test_app(), "/api/forms/templates/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let response = send_json(
        test_app(),
        Method::POST,
        "/api/forms/templates",
        &sample_template("   "),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn template_without_pages_is_rejected() {
    let response = send_json(
        test_app(),
        Method::POST,
        "/api/forms/templates",
        &json!({ "name": "x", "pages": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let response = send_json(
        test_app(),
        Method::POST,
        "/api/forms/templates",
        &json!({ "pages": "not a list" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn delete_removes_template() {
    let app = test_app();
    let created = create(app.clone(), "x").await;
    let uri = format!("/api/forms/templates/{}", created["id"].as_str().unwrap());

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(app.clone(), &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = formdesk_server::ServerConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    let state = formdesk_server::AppState::from_config(config.clone()).unwrap();
    let app = formdesk_server::app(std::sync::Arc::new(state));
    let created = create(app, "保存テスト").await;
    let id = created["id"].as_str().unwrap();

    let state = formdesk_server::AppState::from_config(config).unwrap();
    let app = formdesk_server::app(std::sync::Arc::new(state));
    let fetched = body_json(get(app, &format!("/api/forms/templates/{id}")).await).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn file_storage_keeps_lookalike_ids_apart() {
    use formdesk_core::{Storage, Template};

    let dir = tempfile::tempdir().unwrap();
    let config = formdesk_server::ServerConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let state = formdesk_server::AppState::from_config(config).unwrap();
    let mut original = Template::new("original");
    original.id = Some("a_b".to_string());
    state.templates.storage().save("a_b", &original).await.unwrap();
    let app = formdesk_server::app(std::sync::Arc::new(state));

    let response = send_json(
        app.clone(),
        Method::PUT,
        "/api/forms/templates/a.b",
        &sample_template("intruder"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        get(app.clone(), "/api/forms/templates/a.b").await.status(),
        StatusCode::NOT_FOUND
    );

    let kept = body_json(get(app, "/api/forms/templates/a_b").await).await;
    assert_eq!(kept["name"], "original");
}
