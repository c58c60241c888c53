//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use formdesk_core::api::sanitize_upload_name;
use formdesk_core::{Storage, Template, TemplateApi, TemplateSummary, UploadResponse};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::state::{AppState, Upload};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Path prefix of stored uploads.
pub const UPLOADS_PATH: &str = "/api/forms/uploads";

type AppStateRef = State<Arc<AppState>>;

pub async fn health() -> &'static str {
    "ok"
}

/// GET /api/forms/templates
pub async fn list_templates(State(state): AppStateRef) -> ServerResult<Json<Vec<TemplateSummary>>> {
    Ok(Json(state.templates.list().await?))
}

/// GET /api/forms/templates/{id}
pub async fn get_template(
    State(state): AppStateRef,
    Path(id): Path<String>,
) -> ServerResult<Json<Template>> {
    Ok(Json(state.templates.fetch(&id).await?))
}

/// POST /api/forms/templates
///
/// Any id in the body is replaced by a fresh one.
pub async fn create_template(
    State(state): AppStateRef,
    body: Result<Json<Template>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Template>)> {
    let Json(template) = body.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let saved = state.templates.create(&template).await?;
    tracing::info!(id = ?saved.id, name = %saved.name, "Template created");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/forms/templates/{id}
pub async fn update_template(
    State(state): AppStateRef,
    Path(id): Path<String>,
    body: Result<Json<Template>, JsonRejection>,
) -> ServerResult<Json<Template>> {
    let Json(template) = body.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let saved = state.templates.update(&id, &template).await?;
    tracing::info!(%id, "Template updated");
    Ok(Json(saved))
}

/// DELETE /api/forms/templates/{id}
pub async fn delete_template(
    State(state): AppStateRef,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let storage = state.templates.storage();
    if !storage.exists(&id).await? {
        return Err(ServerError::NotFound(format!("Template {id}")));
    }
    storage.delete(&id).await?;
    tracing::info!(%id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/forms/upload
///
/// Stores the `file` part and answers with a server-relative URL.
/// Uploads are kept in memory until the process exits; once they reach
/// `upload_store_bytes` in total, further uploads get 507 `STORAGE_FULL`.
pub async fn upload(
    State(state): AppStateRef,
    mut multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(&file_name).to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;

        let name = format!("{}-{}", Uuid::new_v4().simple(), sanitize_upload_name(&file_name));
        let size = bytes.len();
        let upload = Upload {
            content_type,
            bytes,
        };
        if !state.store_upload(name.clone(), upload) {
            tracing::warn!(%name, size, stored = state.upload_bytes(), "Upload store full");
            return Err(ServerError::StorageFull);
        }
        tracing::info!(%name, size, "Upload stored");
        return Ok(Json(UploadResponse {
            url: format!("{UPLOADS_PATH}/{name}"),
        }));
    }

    Err(ServerError::BadRequest(format!(
        "multipart field `{UPLOAD_FIELD}` is missing"
    )))
}

/// GET /api/forms/uploads/{name}
pub async fn get_upload(
    State(state): AppStateRef,
    Path(name): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let upload = state
        .uploads
        .get(&name)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| ServerError::NotFound(format!("Upload {name}")))?;
    Ok(([(header::CONTENT_TYPE, upload.content_type)], upload.bytes))
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("scan.PNG"), "image/png");
        assert_eq!(guess_content_type("a.b.jpeg"), "image/jpeg");
        assert_eq!(guess_content_type("noext"), "application/octet-stream");
    }
}
