//! Glue between a [`Designer`] and a [`TemplateApi`].
//!
//! Failures never leave the designer unusable: loading falls back to an
//! empty template, and save or upload errors leave the edits in place.

use crate::api::{ApiResult, TemplateApi};
use crate::designer::{Designer, DesignerConfig};
use crate::template::Template;

/// Open a designer on template `id`, or on a new template when `id` is
/// `None`.
///
/// A failed fetch is logged and yields a designer on an empty template.
pub async fn open_designer(
    api: &dyn TemplateApi,
    id: Option<&str>,
    config: DesignerConfig,
) -> Designer {
    let Some(id) = id else {
        return Designer::new(config);
    };
    match api.fetch(id).await {
        Ok(template) => {
            log::info!("Loaded template {id} ({} pages)", template.pages.len());
            Designer::with_template(template, config)
        }
        Err(e) => {
            log::error!("Failed to load template {id}: {e}");
            Designer::new(config)
        }
    }
}

/// Persist the designer's template.
///
/// Unsaved templates are created and adopt the id the backend assigns;
/// saved ones are updated in place. On failure the error is logged and
/// returned, and the designer is left untouched.
pub async fn save_designer(api: &dyn TemplateApi, designer: &mut Designer) -> ApiResult<Template> {
    let template = designer.template().clone();
    let result = match template.id.as_deref() {
        Some(id) => api.update(id, &template).await,
        None => api.create(&template).await,
    };

    match result {
        Ok(saved) => {
            if let Some(id) = &saved.id {
                designer.set_template_id(id.clone());
            }
            designer.mark_saved();
            log::info!("Saved template {:?}", saved.id);
            Ok(saved)
        }
        Err(e) => {
            log::error!("Failed to save template: {e}");
            Err(e)
        }
    }
}

/// Upload a background image and attach it to the current page.
///
/// Returns the URL on success. Failures are logged only.
pub async fn upload_background(
    api: &dyn TemplateApi,
    designer: &mut Designer,
    file_name: &str,
    bytes: Vec<u8>,
) -> Option<String> {
    match api.upload(file_name, bytes).await {
        Ok(response) => {
            designer.set_page_background(Some(response.url.clone()));
            Some(response.url)
        }
        Err(e) => {
            log::error!("Failed to upload {file_name}: {e}");
            None
        }
    }
}
