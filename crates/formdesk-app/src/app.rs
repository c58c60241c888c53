//! Application state and the eframe update loop.

use std::sync::Arc;

use formdesk_core::api::LOCAL_UPLOAD_PREFIX;
use formdesk_core::session::{open_designer, save_designer, upload_background};
use formdesk_core::shortcuts::{ShortcutAction, ShortcutRegistry};
use formdesk_core::{
    Designer, DesignerConfig, FileStorage, KeyEvent, LocalTemplateApi, MemoryStorage, Modifiers,
    ShortcutOutcome, TemplateApi,
};
use thiserror::Error;

use crate::canvas;
use crate::file_ops::{self, ImageFile};
use crate::remote::HttpTemplateApi;
use crate::ui::{Alert, UiAction, UiState, render_ui};

/// Errors that stop the application from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("Window error: {0}")]
    Eframe(#[from] eframe::Error),
}

/// Startup configuration.
///
/// | variable               | meaning                                    |
/// |------------------------|--------------------------------------------|
/// | `FORMDESK_API_URL`     | template server; unset runs offline        |
/// | `FORMDESK_TEMPLATE_ID` | template to open; unset starts a new one   |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub api_url: Option<String>,
    pub template_id: Option<String>,
    pub designer: DesignerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Formdesk テンプレートデザイナー".to_string(),
            width: 1440.0,
            height: 900.0,
            api_url: None,
            template_id: None,
            designer: DesignerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("FORMDESK_API_URL"),
            template_id: non_empty("FORMDESK_TEMPLATE_ID"),
            ..Self::default()
        }
    }
}

/// The designer window.
pub struct DesignerApp {
    designer: Designer,
    api: Arc<dyn TemplateApi>,
    /// Set when talking to a server; resolves its relative upload URLs.
    remote: Option<Arc<HttpTemplateApi>>,
    runtime: tokio::runtime::Runtime,
    ui_state: UiState,
    designer_config: DesignerConfig,
}

impl DesignerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Result<Self, AppError> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (api, remote, status) = match &config.api_url {
            Some(url) => {
                log::info!("Using template server at {url}");
                let remote = Arc::new(HttpTemplateApi::new(url.clone()));
                let api: Arc<dyn TemplateApi> = remote.clone();
                (api, Some(remote), url.clone())
            }
            None => (offline_api(), None, "オフライン".to_string()),
        };

        let designer = runtime.block_on(open_designer(
            api.as_ref(),
            config.template_id.as_deref(),
            config.designer.clone(),
        ));

        Ok(Self {
            designer,
            api,
            remote,
            runtime,
            ui_state: UiState {
                status,
                ..UiState::default()
            },
            designer_config: config.designer,
        })
    }

    fn save(&mut self) {
        match self
            .runtime
            .block_on(save_designer(self.api.as_ref(), &mut self.designer))
        {
            Ok(_) => {
                self.ui_state.alert = Some(Alert::new("保存しました", "テンプレートを保存しました。"));
            }
            Err(e) => {
                self.ui_state.alert = Some(Alert::new("保存に失敗しました", e.to_string()));
            }
        }
    }

    fn open(&mut self, id: &str) {
        match self.runtime.block_on(self.api.fetch(id)) {
            Ok(template) => {
                log::info!("Opened template {id}");
                self.designer = Designer::with_template(template, self.designer_config.clone());
            }
            Err(e) => {
                log::error!("Failed to open template {id}: {e}");
                self.ui_state.alert = Some(Alert::new("読み込みに失敗しました", e.to_string()));
            }
        }
    }

    fn show_open_dialog(&mut self) {
        match self.runtime.block_on(self.api.list()) {
            Ok(templates) => {
                self.ui_state.templates = templates;
                self.ui_state.open_dialog_open = true;
            }
            Err(e) => {
                log::error!("Failed to list templates: {e}");
                self.ui_state.alert = Some(Alert::new("一覧の取得に失敗しました", e.to_string()));
            }
        }
    }

    fn upload(&mut self, ctx: &egui::Context, file: ImageFile) {
        upload_image(&self.runtime, ctx, self.api.as_ref(), &mut self.designer, file);
    }

    fn apply_shortcut(&mut self, ctx: &egui::Context, action: ShortcutAction) {
        match self.designer.apply_shortcut(action) {
            ShortcutOutcome::SaveRequested => self.save(),
            ShortcutOutcome::Applied if action == ShortcutAction::Copy => {
                export_clipboard(ctx, &self.designer);
            }
            _ => {}
        }
    }

    fn handle_ui_action(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Save => self.save(),
            UiAction::NewTemplate => {
                self.designer = Designer::new(self.designer_config.clone());
            }
            UiAction::ShowOpenDialog => self.show_open_dialog(),
            UiAction::Open(id) => self.open(&id),
            UiAction::AddPage => {
                self.designer.add_page();
            }
            UiAction::DeletePage => {
                if let Err(e) = self.designer.delete_page() {
                    self.ui_state.alert = Some(Alert::new("ページを削除できません", e.to_string()));
                }
            }
            UiAction::PrevPage => self.designer.prev_page(),
            UiAction::NextPage => self.designer.next_page(),
            UiAction::ToggleSnap => self.designer.toggle_snap(),
            UiAction::UploadBackground => {
                if let Some(file) = file_ops::pick_background_image() {
                    self.upload(ctx, file);
                }
            }
            UiAction::ClearBackground => self.designer.set_page_background(None),
            UiAction::Shortcut(action) => self.apply_shortcut(ctx, action),
            UiAction::UpdateField(patch) => {
                self.designer.update_selected(&patch);
            }
            UiAction::SetName(name) => self.designer.set_name(name),
            UiAction::SetDescription(description) => self.designer.set_description(&description),
            UiAction::ShowShortcuts => self.ui_state.shortcuts_modal_open = true,
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.ui_state.is_modal_open() {
            return;
        }
        let events = ctx.input(|i| shortcut_events(&i.events));
        for event in events {
            match ShortcutRegistry::resolve(&event.key, event.modifiers) {
                Some(action) => self.apply_shortcut(ctx, action),
                None => log::trace!("Unbound key {}", event.key),
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let image = match (&file.path, &file.bytes) {
                (Some(path), _) => file_ops::read_image(path),
                (None, Some(bytes)) if file_ops::is_supported_image(bytes) => Some(ImageFile {
                    name: file.name.clone(),
                    bytes: bytes.to_vec(),
                }),
                _ => None,
            };
            if let Some(image) = image {
                self.upload(ctx, image);
            }
        }
    }
}

impl eframe::App for DesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_keyboard(ctx);

        if let Some(action) = render_ui(ctx, &mut self.ui_state, &self.designer) {
            self.handle_ui_action(ctx, action);
        }

        let interactive = !self.ui_state.is_modal_open();
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_gray(235)))
            .show(ctx, |ui| {
                egui::ScrollArea::both().show(ui, |ui| {
                    ui.add_space(24.0);
                    ui.horizontal(|ui| {
                        ui.add_space(24.0);
                        let remote = self.remote.clone();
                        let resolve = |url: &str| match &remote {
                            Some(remote) => remote.resolve_url(url),
                            None => url.to_string(),
                        };
                        canvas::show(ui, &mut self.designer, &resolve, interactive);
                        ui.add_space(24.0);
                    });
                    ui.add_space(24.0);
                });
            });

        if self.designer.is_manipulating() {
            ctx.request_repaint();
        }
    }
}

/// Offline backend: templates on local disk, or in memory when no data
/// directory is available.
fn offline_api() -> Arc<dyn TemplateApi> {
    match FileStorage::default_location() {
        Ok(storage) => {
            log::info!("Offline mode, templates in {}", storage.base_path().display());
            Arc::new(LocalTemplateApi::new(storage))
        }
        Err(e) => {
            log::warn!("No local template directory ({e}); templates will not outlive the session");
            Arc::new(LocalTemplateApi::new(MemoryStorage::new()))
        }
    }
}

/// Upload `file` as the current page's background.
///
/// Failures are logged by the session and leave the background unchanged;
/// no dialog is shown. Offline uploads exist only in memory, so their bytes
/// are handed to the image loader.
fn upload_image(
    runtime: &tokio::runtime::Runtime,
    ctx: &egui::Context,
    api: &dyn TemplateApi,
    designer: &mut Designer,
    file: ImageFile,
) -> Option<String> {
    let ImageFile { name, bytes } = file;
    let url = runtime.block_on(upload_background(api, designer, &name, bytes.clone()))?;
    if url.starts_with(LOCAL_UPLOAD_PREFIX) {
        ctx.include_bytes(url.clone(), bytes);
    }
    Some(url)
}

/// Put the designer's clipboard field on the system clipboard as JSON.
///
/// The platform layer only reports a paste keystroke while the system
/// clipboard holds text, so a copy must leave some there for paste to work.
pub fn export_clipboard(ctx: &egui::Context, designer: &Designer) {
    let Some(field) = designer.clipboard() else {
        return;
    };
    match serde_json::to_string(field) {
        Ok(json) => ctx.copy_text(json),
        Err(e) => log::warn!("Could not export copied field: {e}"),
    }
}

/// Translate egui input into designer key events.
///
/// Copy and paste arrive as dedicated events on every platform, so key
/// presses that would resolve to them are dropped to avoid acting twice.
pub fn shortcut_events(events: &[egui::Event]) -> Vec<KeyEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Copy => Some(KeyEvent::new("c", Modifiers::COMMAND)),
            egui::Event::Paste(_) => Some(KeyEvent::new("v", Modifiers::COMMAND)),
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => {
                let event = KeyEvent::new(key.name(), to_modifiers(*modifiers));
                match ShortcutRegistry::resolve(&event.key, event.modifiers) {
                    Some(ShortcutAction::Copy | ShortcutAction::Paste) => None,
                    _ => Some(event),
                }
            }
            _ => None,
        })
        .collect()
}

fn to_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        ctrl: modifiers.ctrl,
        alt: modifiers.alt,
        meta: modifiers.mac_cmd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdesk_core::api::{ApiError, ApiResult, UploadResponse};
    use formdesk_core::storage::BoxFuture;

    fn key(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    fn actions(events: &[egui::Event]) -> Vec<Option<ShortcutAction>> {
        shortcut_events(events)
            .iter()
            .map(|e| ShortcutRegistry::resolve(&e.key, e.modifiers))
            .collect()
    }

    #[test]
    fn test_copy_paste_events() {
        let events = [egui::Event::Copy, egui::Event::Paste("ignored".to_string())];
        assert_eq!(
            actions(&events),
            vec![Some(ShortcutAction::Copy), Some(ShortcutAction::Paste)]
        );
    }

    #[test]
    fn test_copy_key_not_doubled() {
        let events = [key(egui::Key::C, egui::Modifiers::CTRL), egui::Event::Copy];
        assert_eq!(actions(&events), vec![Some(ShortcutAction::Copy)]);
    }

    #[test]
    fn test_save_and_delete_keys() {
        let events = [
            key(egui::Key::S, egui::Modifiers::CTRL),
            key(egui::Key::S, egui::Modifiers::MAC_CMD),
            key(egui::Key::Delete, egui::Modifiers::NONE),
            key(egui::Key::S, egui::Modifiers::NONE),
        ];
        assert_eq!(
            actions(&events),
            vec![
                Some(ShortcutAction::Save),
                Some(ShortcutAction::Save),
                Some(ShortcutAction::Delete),
                None,
            ]
        );
    }

    #[test]
    fn test_released_keys_ignored() {
        let released = egui::Event::Key {
            key: egui::Key::Delete,
            physical_key: None,
            pressed: false,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        };
        assert!(shortcut_events(&[released]).is_empty());
    }

    fn copied_texts(output: &egui::FullOutput) -> Vec<String> {
        output
            .platform_output
            .commands
            .iter()
            .filter_map(|command| match command {
                egui::OutputCommand::CopyText(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_copy_fills_system_clipboard() {
        let mut designer = Designer::new(DesignerConfig::default());
        designer.drop_field(formdesk_core::FieldType::Text, kurbo::Point::new(40.0, 40.0));
        assert!(designer.copy());

        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            export_clipboard(ctx, &designer);
        });
        let texts = copied_texts(&output);
        assert_eq!(texts.len(), 1);
        let field: formdesk_core::Field = serde_json::from_str(&texts[0]).unwrap();
        assert_eq!(Some(&field), designer.clipboard());
    }

    #[test]
    fn test_nothing_exported_without_copy() {
        let designer = Designer::new(DesignerConfig::default());
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            export_clipboard(ctx, &designer);
        });
        assert!(copied_texts(&output).is_empty());
    }

    #[test]
    fn test_paste_event_reaches_designer() {
        let mut designer = Designer::new(DesignerConfig::default());
        designer.drop_field(formdesk_core::FieldType::Text, kurbo::Point::new(40.0, 40.0));
        designer.copy();

        // Whatever text the system clipboard returns, the designer's own copy is pasted.
        for event in shortcut_events(&[egui::Event::Paste("{}".to_string())]) {
            designer.handle_key(&event);
        }
        assert_eq!(designer.current_page().fields.len(), 2);
    }

    struct Unreachable;

    impl TemplateApi for Unreachable {
        fn list(&self) -> BoxFuture<'_, ApiResult<Vec<formdesk_core::TemplateSummary>>> {
            Box::pin(async { Err(ApiError::Transport("unreachable".into())) })
        }
        fn fetch(&self, _: &str) -> BoxFuture<'_, ApiResult<formdesk_core::Template>> {
            Box::pin(async { Err(ApiError::Transport("unreachable".into())) })
        }
        fn create(
            &self,
            _: &formdesk_core::Template,
        ) -> BoxFuture<'_, ApiResult<formdesk_core::Template>> {
            Box::pin(async { Err(ApiError::Transport("unreachable".into())) })
        }
        fn update(
            &self,
            _: &str,
            _: &formdesk_core::Template,
        ) -> BoxFuture<'_, ApiResult<formdesk_core::Template>> {
            Box::pin(async { Err(ApiError::Transport("unreachable".into())) })
        }
        fn upload(&self, _: &str, _: Vec<u8>) -> BoxFuture<'_, ApiResult<UploadResponse>> {
            Box::pin(async { Err(ApiError::Transport("unreachable".into())) })
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn png() -> ImageFile {
        ImageFile {
            name: "bg.png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn test_failed_upload_leaves_background_unset() {
        let mut designer = Designer::new(DesignerConfig::default());
        let ctx = egui::Context::default();
        let url = upload_image(&runtime(), &ctx, &Unreachable, &mut designer, png());
        assert!(url.is_none());
        assert!(designer.current_page().background_image.is_none());
    }

    #[test]
    fn test_offline_upload_sets_background() {
        let api = LocalTemplateApi::new(MemoryStorage::new());
        let mut designer = Designer::new(DesignerConfig::default());
        let ctx = egui::Context::default();
        let url = upload_image(&runtime(), &ctx, &api, &mut designer, png()).unwrap();
        assert!(url.starts_with(LOCAL_UPLOAD_PREFIX));
        assert_eq!(designer.current_page().background_image.as_deref(), Some(url.as_str()));
    }

    #[test]
    fn test_config_defaults_offline() {
        let config = AppConfig::default();
        assert!(config.api_url.is_none());
        assert!(config.template_id.is_none());
    }
}
