//! HTTP client for the template server.
//!
//! Implements [`TemplateApi`] over the server's JSON routes using
//! [`reqwest`].

use formdesk_core::api::{ApiError, ApiResult, TemplateApi, UploadResponse};
use formdesk_core::storage::BoxFuture;
use formdesk_core::{Template, TemplateSummary};
use serde::de::DeserializeOwned;

/// Template API backed by a running `formdesk-server`.
pub struct HttpTemplateApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateApi {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:3030`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` (which starts with `/`).
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of one template, with `id` percent-encoded as a single path segment.
    fn template_url(&self, id: &str) -> ApiResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.endpoint("/api/forms/templates"))
            .map_err(|e| ApiError::Transport(format!("Invalid server URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("Invalid server URL {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    /// Turn a URL returned by the server into one the image loader can fetch.
    ///
    /// Server-relative paths are resolved against the base URL; anything
    /// with a scheme is returned unchanged.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            self.endpoint(url)
        } else {
            url.to_string()
        }
    }

    /// Decode a JSON body, or map a non-2xx status to an [`ApiError`].
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        id: Option<&str>,
    ) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body, id));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

/// Map an error status and body to an [`ApiError`].
///
/// The server reports errors as `{"error": "...", "code": "..."}`; other
/// bodies are passed through as the message.
fn status_error(status: u16, body: &str, id: Option<&str>) -> ApiError {
    if status == 404
        && let Some(id) = id
    {
        return ApiError::NotFound(id.to_string());
    }
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    if status == 400 {
        ApiError::Validation(message)
    } else {
        ApiError::Status { status, message }
    }
}

impl TemplateApi for HttpTemplateApi {
    fn list(&self) -> BoxFuture<'_, ApiResult<Vec<TemplateSummary>>> {
        let url = self.endpoint("/api/forms/templates");
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(transport)?;
            Self::parse_response(response, None).await
        })
    }

    fn fetch(&self, id: &str) -> BoxFuture<'_, ApiResult<Template>> {
        let id = id.to_string();
        let url = self.template_url(&id);
        Box::pin(async move {
            let response = self.client.get(url?).send().await.map_err(transport)?;
            Self::parse_response(response, Some(&id)).await
        })
    }

    fn create(&self, template: &Template) -> BoxFuture<'_, ApiResult<Template>> {
        let template = template.clone();
        let url = self.endpoint("/api/forms/templates");
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .json(&template)
                .send()
                .await
                .map_err(transport)?;
            Self::parse_response(response, None).await
        })
    }

    fn update(&self, id: &str, template: &Template) -> BoxFuture<'_, ApiResult<Template>> {
        let id = id.to_string();
        let template = template.clone();
        let url = self.template_url(&id);
        Box::pin(async move {
            let response = self
                .client
                .put(url?)
                .json(&template)
                .send()
                .await
                .map_err(transport)?;
            Self::parse_response(response, Some(&id)).await
        })
    }

    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> BoxFuture<'_, ApiResult<UploadResponse>> {
        let url = self.endpoint("/api/forms/upload");
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        Box::pin(async move {
            let form = reqwest::multipart::Form::new().part("file", part);
            let response = self
                .client
                .post(url)
                .multipart(form)
                .send()
                .await
                .map_err(transport)?;
            Self::parse_response(response, None).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = HttpTemplateApi::new("http://localhost:3030/");
        assert_eq!(api.base_url(), "http://localhost:3030");
        assert_eq!(
            api.endpoint("/api/forms/templates"),
            "http://localhost:3030/api/forms/templates"
        );
    }

    #[test]
    fn test_template_url_encodes_id() {
        let api = HttpTemplateApi::new("http://localhost:3030/");
        assert_eq!(
            api.template_url("3f2a").unwrap().as_str(),
            "http://localhost:3030/api/forms/templates/3f2a"
        );
        assert_eq!(
            api.template_url("a/b?c#d").unwrap().as_str(),
            "http://localhost:3030/api/forms/templates/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_template_url_rejects_bad_base() {
        let api = HttpTemplateApi::new("not a url");
        assert!(matches!(api.template_url("x"), Err(ApiError::Transport(_))));
    }

    #[test]
    fn test_resolve_url() {
        let api = HttpTemplateApi::new("http://localhost:3030");
        assert_eq!(
            api.resolve_url("/api/forms/uploads/a.png"),
            "http://localhost:3030/api/forms/uploads/a.png"
        );
        assert_eq!(
            api.resolve_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(404, "", Some("t1")),
            ApiError::NotFound(id) if id == "t1"
        ));
        assert!(matches!(
            status_error(400, r#"{"error":"name must not be empty","code":"VALIDATION"}"#, None),
            ApiError::Validation(m) if m == "name must not be empty"
        ));
        assert!(matches!(
            status_error(500, "boom", None),
            ApiError::Status { status: 500, message } if message == "boom"
        ));
        assert!(matches!(
            status_error(404, "", None),
            ApiError::Status { status: 404, .. }
        ));
    }
}
