//! Persistence adapter: the template API the designer saves through.
//!
//! [`TemplateApi`] mirrors the HTTP surface of the template server:
//!
//! | method   | request                           |
//! |----------|-----------------------------------|
//! | `list`   | `GET /api/forms/templates`        |
//! | `fetch`  | `GET /api/forms/templates/{id}`   |
//! | `create` | `POST /api/forms/templates`       |
//! | `update` | `PUT /api/forms/templates/{id}`   |
//! | `upload` | `POST /api/forms/upload` (`file`) |
//!
//! [`LocalTemplateApi`] serves the same contract in-process on top of a
//! [`Storage`] backend.

use crate::storage::{BoxFuture, Storage, StorageError};
use crate::template::{Template, TemplateSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

/// URL scheme of uploads held by [`LocalTemplateApi`].
pub const LOCAL_UPLOAD_PREFIX: &str = "bytes://uploads/";

/// Errors returned by a [`TemplateApi`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    Serialization(String),
    #[error("Invalid template: {0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Body returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Remote store of templates.
pub trait TemplateApi: Send + Sync {
    fn list(&self) -> BoxFuture<'_, ApiResult<Vec<TemplateSummary>>>;

    fn fetch(&self, id: &str) -> BoxFuture<'_, ApiResult<Template>>;

    /// Store a new template. The returned copy carries the assigned id.
    fn create(&self, template: &Template) -> BoxFuture<'_, ApiResult<Template>>;

    /// Replace an existing template.
    fn update(&self, id: &str, template: &Template) -> BoxFuture<'_, ApiResult<Template>>;

    /// Upload a file (a page background) and get back its URL.
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> BoxFuture<'_, ApiResult<UploadResponse>>;
}

/// Check what the server also rejects: a blank name or no pages.
pub fn validate_template(template: &Template) -> ApiResult<()> {
    if template.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    if template.pages.is_empty() {
        return Err(ApiError::Validation(
            "template must have at least one page".to_string(),
        ));
    }
    Ok(())
}

/// Make an uploaded file name safe to use as a path segment.
pub fn sanitize_upload_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = safe.trim_start_matches('.');
    if safe.is_empty() {
        "upload".to_string()
    } else {
        safe.to_string()
    }
}

/// In-process [`TemplateApi`] over a [`Storage`] backend.
///
/// Used for offline editing. Uploaded files stay in memory for the
/// lifetime of the adapter.
pub struct LocalTemplateApi<S: Storage> {
    storage: S,
    uploads: RwLock<HashMap<String, Vec<u8>>>,
}

impl<S: Storage> LocalTemplateApi<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            uploads: RwLock::new(HashMap::new()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Bytes of an upload previously returned by `upload`.
    pub fn upload_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let name = url.strip_prefix(LOCAL_UPLOAD_PREFIX)?;
        self.uploads.read().ok()?.get(name).cloned()
    }
}

impl<S: Storage> TemplateApi for LocalTemplateApi<S> {
    fn list(&self) -> BoxFuture<'_, ApiResult<Vec<TemplateSummary>>> {
        Box::pin(async move {
            let mut summaries = Vec::new();
            for id in self.storage.list().await? {
                match self.storage.load(&id).await {
                    Ok(mut template) => {
                        template.id.get_or_insert(id);
                        summaries.push(template.summary());
                    }
                    Err(e) => log::warn!("Skipping unreadable template {id}: {e}"),
                }
            }
            summaries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(summaries)
        })
    }

    fn fetch(&self, id: &str) -> BoxFuture<'_, ApiResult<Template>> {
        let id = id.to_string();
        Box::pin(async move {
            match self.storage.load(&id).await {
                Ok(mut template) => {
                    template.id = Some(id);
                    Ok(template)
                }
                Err(StorageError::NotFound(_)) => Err(ApiError::NotFound(id)),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn create(&self, template: &Template) -> BoxFuture<'_, ApiResult<Template>> {
        let mut template = template.clone();
        Box::pin(async move {
            validate_template(&template)?;
            let id = Uuid::new_v4().to_string();
            template.id = Some(id.clone());
            self.storage.save(&id, &template).await?;
            log::info!("Created template {id}");
            Ok(template)
        })
    }

    fn update(&self, id: &str, template: &Template) -> BoxFuture<'_, ApiResult<Template>> {
        let id = id.to_string();
        let mut template = template.clone();
        Box::pin(async move {
            validate_template(&template)?;
            if !self.storage.exists(&id).await? {
                return Err(ApiError::NotFound(id));
            }
            template.id = Some(id.clone());
            self.storage.save(&id, &template).await?;
            log::info!("Updated template {id}");
            Ok(template)
        })
    }

    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> BoxFuture<'_, ApiResult<UploadResponse>> {
        let name = format!("{}-{}", Uuid::new_v4().simple(), sanitize_upload_name(file_name));
        Box::pin(async move {
            let mut uploads = self
                .uploads
                .write()
                .map_err(|e| ApiError::Storage(StorageError::Other(format!("Lock error: {e}"))))?;
            log::info!("Stored upload {name} ({} bytes)", bytes.len());
            uploads.insert(name.clone(), bytes);
            Ok(UploadResponse {
                url: format!("{LOCAL_UPLOAD_PREFIX}{name}"),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, block_on};
    use crate::template::Page;

    fn api() -> LocalTemplateApi<MemoryStorage> {
        LocalTemplateApi::new(MemoryStorage::new())
    }

    #[test]
    fn test_create_assigns_id() {
        let api = api();
        let saved = block_on(api.create(&Template::new("申込書"))).unwrap();
        let id = saved.id.clone().unwrap();
        assert!(!id.is_empty());

        let fetched = block_on(api.fetch(&id)).unwrap();
        assert_eq!(fetched, saved);
    }

    #[test]
    fn test_create_ignores_client_id() {
        let api = api();
        let mut template = Template::new("x");
        template.id = Some("client".to_string());
        let saved = block_on(api.create(&template)).unwrap();
        assert_ne!(saved.id.as_deref(), Some("client"));
    }

    #[test]
    fn test_update_requires_existing() {
        let api = api();
        let result = block_on(api.update("missing", &Template::new("x")));
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_update_replaces() {
        let api = api();
        let saved = block_on(api.create(&Template::new("v1"))).unwrap();
        let id = saved.id.clone().unwrap();

        let mut changed = saved.clone();
        changed.name = "v2".to_string();
        changed.pages.push(Page::new(2));
        block_on(api.update(&id, &changed)).unwrap();

        let fetched = block_on(api.fetch(&id)).unwrap();
        assert_eq!(fetched.name, "v2");
        assert_eq!(fetched.pages.len(), 2);
    }

    #[test]
    fn test_update_does_not_alias_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let api = LocalTemplateApi::new(crate::FileStorage::new(dir.path().to_path_buf()).unwrap());
        block_on(api.storage().save("a_b", &Template::new("original"))).unwrap();

        let result = block_on(api.update("a.b", &Template::new("intruder")));
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(block_on(api.fetch("a_b")).unwrap().name, "original");
    }

    #[test]
    fn test_fetch_missing() {
        let result = block_on(api().fetch("nope"));
        assert!(matches!(result, Err(ApiError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_validation() {
        let api = api();
        let blank = Template::new("   ");
        assert!(matches!(
            block_on(api.create(&blank)),
            Err(ApiError::Validation(_))
        ));

        let mut no_pages = Template::new("x");
        no_pages.pages.clear();
        assert!(matches!(
            block_on(api.create(&no_pages)),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_list_sorted_by_name() {
        let api = api();
        block_on(api.create(&Template::new("b"))).unwrap();
        block_on(api.create(&Template::new("a"))).unwrap();
        let list = block_on(api.list()).unwrap();
        let names: Vec<_> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(list.iter().all(|s| !s.id.is_empty()));
    }

    #[test]
    fn test_upload_round_trip() {
        let api = api();
        let response = block_on(api.upload("scan 01.png", vec![1, 2, 3])).unwrap();
        assert!(response.url.starts_with(LOCAL_UPLOAD_PREFIX));
        assert!(response.url.ends_with("scan_01.png"));
        assert_eq!(api.upload_bytes(&response.url), Some(vec![1, 2, 3]));
        assert_eq!(api.upload_bytes("bytes://uploads/other"), None);
    }

    #[test]
    fn test_sanitize_upload_name() {
        assert_eq!(sanitize_upload_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_upload_name("C:\\scans\\form.jpg"), "form.jpg");
        assert_eq!(sanitize_upload_name(".hidden"), "hidden");
        assert_eq!(sanitize_upload_name(""), "upload");
        assert_eq!(sanitize_upload_name("請求書.png"), "請求書.png");
    }
}
