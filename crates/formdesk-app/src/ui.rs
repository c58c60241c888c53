//! UI components using egui: top bar, palette, property panel and dialogs.

use egui::{Align2, Color32, Context, CornerRadius, Frame, Margin, Pos2, Stroke, Vec2};
use formdesk_core::shortcuts::{ShortcutAction, ShortcutRegistry};
use formdesk_core::{Designer, Field, FieldPatch, FieldType, TemplateSummary};

use formdesk_widgets::{
    ActionButton, ColorRow, FontSizeButton, ListItem, PaletteItem, ToggleButton, panel_frame,
    property_row, section_label, separator, toolbar_frame, vertical_separator,
};

/// Font size presets offered in the property panel.
const FONT_SIZES: [f64; 5] = [10.0, 12.0, 14.0, 16.0, 20.0];

/// Actions triggered from the UI, applied by the app after rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Persist the template.
    Save,
    /// Start over with a new, unsaved template.
    NewTemplate,
    /// Fetch the template list and show the open dialog.
    ShowOpenDialog,
    /// Open the template with this id.
    Open(String),
    AddPage,
    DeletePage,
    PrevPage,
    NextPage,
    ToggleSnap,
    /// Pick an image and upload it as the current page's background.
    UploadBackground,
    ClearBackground,
    Shortcut(ShortcutAction),
    /// Merge a patch into the selected field.
    UpdateField(FieldPatch),
    SetName(String),
    SetDescription(String),
    ShowShortcuts,
}

/// A blocking message dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// UI state that is not part of the document.
#[derive(Debug, Default)]
pub struct UiState {
    /// Pending blocking dialog; the canvas is inert while one is shown.
    pub alert: Option<Alert>,
    /// Whether the open dialog is visible.
    pub open_dialog_open: bool,
    /// Templates offered in the open dialog.
    pub templates: Vec<TemplateSummary>,
    /// Whether the keyboard shortcuts modal is open.
    pub shortcuts_modal_open: bool,
    /// Short status text shown in the top bar (last save, offline mode).
    pub status: String,
}

impl UiState {
    /// Whether a modal is covering the canvas.
    pub fn is_modal_open(&self) -> bool {
        self.alert.is_some() || self.open_dialog_open || self.shortcuts_modal_open
    }
}

/// Render all UI panels and return any triggered action.
///
/// Must run before the central canvas panel so the side panels claim
/// their space first.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, designer: &Designer) -> Option<UiAction> {
    let top_action = render_top_bar(ctx, ui_state, designer);
    render_palette(ctx);
    let panel_action = render_property_panel(ctx, designer);

    let dialog_action = if ui_state.alert.is_some() {
        render_alert(ctx, ui_state);
        None
    } else if ui_state.open_dialog_open {
        render_open_dialog(ctx, ui_state)
    } else {
        if ui_state.shortcuts_modal_open {
            render_shortcuts_modal(ctx, ui_state);
        }
        None
    };

    top_action.or(panel_action).or(dialog_action)
}

/// Top bar: template name, page navigation, snap toggle, persistence.
fn render_top_bar(ctx: &Context, ui_state: &UiState, designer: &Designer) -> Option<UiAction> {
    let mut action = None;
    let template = designer.template();

    egui::TopBottomPanel::top("top_bar")
        .frame(toolbar_frame())
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);

                if ActionButton::new("新規").show(ui) {
                    action = Some(UiAction::NewTemplate);
                }
                if ActionButton::new("開く…").show(ui) {
                    action = Some(UiAction::ShowOpenDialog);
                }

                let mut name = template.name.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut name)
                        .desired_width(220.0)
                        .hint_text("テンプレート名"),
                );
                if response.changed() {
                    action = Some(UiAction::SetName(name));
                }
                if designer.is_dirty() {
                    ui.label(egui::RichText::new("●").color(Color32::from_gray(150)))
                        .on_hover_text("未保存の変更があります");
                }

                vertical_separator(ui);

                if ActionButton::new("◀").enabled(designer.current_page_index() > 0).show(ui) {
                    action = Some(UiAction::PrevPage);
                }
                let page = designer.current_page();
                ui.label(format!(
                    "ページ {} ({}/{})",
                    page.page_number,
                    designer.current_page_index() + 1,
                    designer.page_count()
                ));
                if ActionButton::new("▶")
                    .enabled(designer.current_page_index() + 1 < designer.page_count())
                    .show(ui)
                {
                    action = Some(UiAction::NextPage);
                }
                if ActionButton::new("＋ ページ").show(ui) {
                    action = Some(UiAction::AddPage);
                }
                if ActionButton::new("ページ削除").danger().show(ui) {
                    action = Some(UiAction::DeletePage);
                }

                vertical_separator(ui);

                if ToggleButton::new("グリッド吸着", designer.snap().is_enabled())
                    .height(28.0)
                    .show(ui)
                {
                    action = Some(UiAction::ToggleSnap);
                }
                if ActionButton::new("背景画像…").show(ui) {
                    action = Some(UiAction::UploadBackground);
                }
                if page.background_image.is_some() && ActionButton::new("背景を外す").show(ui) {
                    action = Some(UiAction::ClearBackground);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let save = ShortcutRegistry::for_action(ShortcutAction::Save);
                    let mut button = ActionButton::new("保存").primary().min_width(72.0);
                    if let Some(shortcut) = save {
                        button = button.shortcut(shortcut.format());
                    }
                    if button.show(ui) {
                        action = Some(UiAction::Save);
                    }
                    if ActionButton::new("?").show(ui) {
                        action = Some(UiAction::ShowShortcuts);
                    }
                    if !ui_state.status.is_empty() {
                        section_label(ui, &ui_state.status);
                    }
                });
            });
        });

    action
}

/// Left palette of field types. Items are dragged onto the canvas.
fn render_palette(ctx: &Context) {
    egui::SidePanel::left("palette")
        .resizable(false)
        .exact_width(180.0)
        .frame(Frame::new().fill(Color32::from_gray(248)).inner_margin(Margin::same(10)))
        .show(ctx, |ui| {
            section_label(ui, "フィールド");
            ui.add_space(6.0);
            ui.spacing_mut().item_spacing = Vec2::new(0.0, 6.0);
            for field_type in FieldType::ALL {
                PaletteItem::new(field_type.label(), field_type)
                    .hint(field_type.token())
                    .show(ui, egui::Id::new(("palette", field_type.token())));
            }
            ui.add_space(8.0);
            section_label(ui, "キャンバスへドラッグして追加");
        });
}

/// Right panel: selected field's attributes, or template metadata.
fn render_property_panel(ctx: &Context, designer: &Designer) -> Option<UiAction> {
    let mut action = None;

    egui::SidePanel::right("properties")
        .resizable(false)
        .exact_width(280.0)
        .frame(Frame::new().fill(Color32::from_gray(248)).inner_margin(Margin::same(10)))
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    action = match designer.selected_field() {
                        Some(field) => field_properties(ui, field, designer.clipboard().is_some()),
                        None => template_properties(ui, designer),
                    };
                });
            });
        });

    action
}

fn field_properties(ui: &mut egui::Ui, field: &Field, can_paste: bool) -> Option<UiAction> {
    let mut patch = FieldPatch::default();
    let mut action = None;
    let style = &field.style;

    section_label(ui, &format!("{} フィールド", field.field_type.label()));
    ui.add_space(4.0);

    property_row(ui, "ラベル", |ui| {
        let mut label = field.label.clone();
        if ui.text_edit_singleline(&mut label).changed() {
            patch.label = Some(label);
        }
    });
    property_row(ui, "プレースホルダー", |ui| {
        let mut placeholder = field.placeholder.clone().unwrap_or_default();
        if ui.text_edit_singleline(&mut placeholder).changed() {
            patch.placeholder = Some(placeholder);
        }
    });
    property_row(ui, "必須", |ui| {
        let mut required = field.required.unwrap_or(false);
        if ui.checkbox(&mut required, "").changed() {
            patch.required = Some(required);
        }
    });

    separator(ui);
    section_label(ui, "サイズ");
    property_row(ui, "幅", |ui| {
        let mut width = style.width;
        if ui.add(egui::DragValue::new(&mut width).suffix(" px")).changed() {
            patch.width = Some(width);
        }
    });
    property_row(ui, "高さ", |ui| {
        let mut height = style.height;
        if ui.add(egui::DragValue::new(&mut height).suffix(" px")).changed() {
            patch.height = Some(height);
        }
    });
    property_row(ui, "位置", |ui| {
        ui.label(format!("{:.0}, {:.0}", style.left, style.top));
    });

    separator(ui);
    section_label(ui, "文字");
    property_row(ui, "サイズ", |ui| {
        let mut font_size = style.font_size;
        if ui
            .add(egui::DragValue::new(&mut font_size).range(1.0..=200.0).suffix(" px"))
            .changed()
        {
            patch.font_size = Some(font_size);
        }
    });
    ui.horizontal(|ui| {
        ui.add_space(formdesk_widgets::sizing::LABEL_WIDTH + 8.0);
        for size in FONT_SIZES {
            if FontSizeButton::new(size as f32, style.font_size == size).show(ui) {
                patch.font_size = Some(size);
            }
        }
    });
    property_row(ui, "太さ", |ui| {
        let bold = style.font_weight.as_deref() == Some("bold");
        if ToggleButton::new("標準", !bold).show(ui) {
            patch.font_weight = Some("normal".to_string());
        }
        if ToggleButton::new("太字", bold).show(ui) {
            patch.font_weight = Some("bold".to_string());
        }
    });

    separator(ui);
    section_label(ui, "色");
    ui.label("文字色");
    if let Some(color) = ColorRow::new(Some(&style.color)).show(ui) {
        patch.color = Some(color);
    }
    ui.label("背景色");
    if let Some(color) = ColorRow::new(Some(&style.background_color)).show(ui) {
        patch.background_color = Some(color);
    }
    ui.label("枠線色");
    if let Some(color) = ColorRow::new(style.border_color.as_deref())
        .optional()
        .show(ui)
    {
        patch.border_color = Some(color);
    }

    if let Some(options) = &field.options {
        separator(ui);
        section_label(ui, "選択肢");
        for option in options {
            ui.label(format!("・{option}"));
        }
    }

    separator(ui);
    ui.horizontal(|ui| {
        if shortcut_button(ui, "コピー", ShortcutAction::Copy, true) {
            action = Some(UiAction::Shortcut(ShortcutAction::Copy));
        }
        if shortcut_button(ui, "貼り付け", ShortcutAction::Paste, can_paste) {
            action = Some(UiAction::Shortcut(ShortcutAction::Paste));
        }
        let delete = ShortcutRegistry::for_action(ShortcutAction::Delete);
        let mut button = ActionButton::new("削除").danger();
        if let Some(shortcut) = delete {
            button = button.shortcut(shortcut.format());
        }
        if button.show(ui) {
            action = Some(UiAction::Shortcut(ShortcutAction::Delete));
        }
    });

    action.or_else(|| (!patch.is_empty()).then_some(UiAction::UpdateField(patch)))
}

fn shortcut_button(ui: &mut egui::Ui, label: &str, action: ShortcutAction, enabled: bool) -> bool {
    let mut button = ActionButton::new(label).enabled(enabled);
    if let Some(shortcut) = ShortcutRegistry::for_action(action) {
        button = button.shortcut(shortcut.format());
    }
    button.show(ui)
}

fn template_properties(ui: &mut egui::Ui, designer: &Designer) -> Option<UiAction> {
    let mut action = None;
    let template = designer.template();

    section_label(ui, "テンプレート");
    ui.add_space(4.0);
    ui.label(egui::RichText::new(&template.name).strong());
    ui.add_space(6.0);
    section_label(ui, "説明");
    let mut description = template.description.clone().unwrap_or_default();
    if ui
        .add(egui::TextEdit::multiline(&mut description).desired_rows(3))
        .changed()
    {
        action = Some(UiAction::SetDescription(description));
    }

    separator(ui);
    property_row(ui, "ページ数", |ui| ui.label(designer.page_count().to_string()));
    property_row(ui, "フィールド", |ui| {
        ui.label(template.field_count().to_string())
    });
    if let Some(id) = &template.id {
        property_row(ui, "ID", |ui| ui.label(egui::RichText::new(id).small()));
    } else {
        section_label(ui, "未保存のテンプレート");
    }

    if designer.clipboard().is_some() {
        separator(ui);
        if shortcut_button(ui, "貼り付け", ShortcutAction::Paste, true) {
            action = Some(UiAction::Shortcut(ShortcutAction::Paste));
        }
    }

    action
}

/// Dim the screen behind a modal. Clicking the backdrop runs `on_click`.
fn backdrop(ctx: &Context, id: &str, on_click: impl FnOnce()) {
    egui::Area::new(egui::Id::new(id))
        .fixed_pos(Pos2::ZERO)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            let screen_rect = ctx.input(|i| i.content_rect());
            let response = ui.allocate_rect(screen_rect, egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(80));
            if response.clicked() {
                on_click();
            }
        });
}

fn dialog_frame() -> Frame {
    Frame::new()
        .fill(Color32::WHITE)
        .corner_radius(CornerRadius::same(12))
        .stroke(Stroke::new(1.0, Color32::from_gray(200)))
        .inner_margin(Margin::same(20))
}

fn dialog_title(ui: &mut egui::Ui, title: &str) {
    ui.label(
        egui::RichText::new(title)
            .size(16.0)
            .strong()
            .color(Color32::from_gray(30)),
    );
}

/// Blocking message dialog. Only the OK button dismisses it.
fn render_alert(ctx: &Context, ui_state: &mut UiState) {
    let Some(alert) = ui_state.alert.clone() else {
        return;
    };
    backdrop(ctx, "alert_backdrop", || ());

    let mut dismissed = false;
    egui::Area::new(egui::Id::new("alert"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            dialog_frame().show(ui, |ui| {
                ui.set_width(320.0);
                dialog_title(ui, &alert.title);
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(&alert.message)
                        .size(13.0)
                        .color(Color32::from_gray(60)),
                );
                ui.add_space(16.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ActionButton::new("OK").primary().min_width(72.0).show(ui) {
                        dismissed = true;
                    }
                });
            });
        });

    if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
        ui_state.alert = None;
    }
}

/// Template picker.
fn render_open_dialog(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut action = None;
    let mut close = false;
    backdrop(ctx, "open_dialog_backdrop", || close = true);

    egui::Area::new(egui::Id::new("open_dialog"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            dialog_frame().show(ui, |ui| {
                ui.set_width(360.0);
                ui.horizontal(|ui| {
                    dialog_title(ui, "テンプレートを開く");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ActionButton::new("✕").show(ui) {
                            close = true;
                        }
                    });
                });
                ui.add_space(12.0);

                if ui_state.templates.is_empty() {
                    ui.label(
                        egui::RichText::new("保存されたテンプレートはありません")
                            .color(Color32::from_gray(150)),
                    );
                } else {
                    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                        for summary in &ui_state.templates {
                            let detail = format!("{} ページ", summary.page_count);
                            if ListItem::new(&summary.name)
                                .detail(&detail)
                                .subtitle(summary.description.as_deref())
                                .show(ui)
                            {
                                action = Some(UiAction::Open(summary.id.clone()));
                                close = true;
                            }
                        }
                    });
                }
            });
        });

    if close {
        ui_state.open_dialog_open = false;
    }
    action
}

fn render_shortcuts_modal(ctx: &Context, ui_state: &mut UiState) {
    let mut close = false;
    backdrop(ctx, "shortcuts_backdrop", || close = true);

    egui::Area::new(egui::Id::new("shortcuts_modal"))
        .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            dialog_frame().show(ui, |ui| {
                ui.set_width(360.0);
                ui.horizontal(|ui| {
                    dialog_title(ui, "キーボードショートカット");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ActionButton::new("✕").show(ui) {
                            close = true;
                        }
                    });
                });
                ui.add_space(12.0);
                for shortcut in ShortcutRegistry::all() {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(shortcut.format())
                                .size(12.0)
                                .family(egui::FontFamily::Monospace)
                                .color(Color32::from_rgb(100, 116, 139)),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(egui::RichText::new(shortcut.description).size(12.0));
                        });
                    });
                    ui.add_space(4.0);
                }
                section_label(ui, "macOS では Ctrl の代わりに ⌘ を使います");
            });
        });

    if close {
        ui_state.shortcuts_modal_open = false;
    }
}
