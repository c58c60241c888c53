//! Button components: action buttons, toggle buttons, font size presets.

use egui::{Align2, Color32, CornerRadius, CursorIcon, Sense, Stroke, StrokeKind, Ui, vec2};

use crate::{sizing, theme};

/// Visual weight of an [`ActionButton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonKind {
    /// Solid accent background (save).
    Primary,
    /// Light gray background.
    #[default]
    Secondary,
    /// Red text, red fill on hover (delete).
    Danger,
}

/// A text button for toolbar and panel actions.
pub struct ActionButton<'a> {
    label: &'a str,
    kind: ButtonKind,
    enabled: bool,
    shortcut: Option<String>,
    min_width: Option<f32>,
}

impl<'a> ActionButton<'a> {
    /// Create a new secondary button.
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            kind: ButtonKind::Secondary,
            enabled: true,
            shortcut: None,
            min_width: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.kind = ButtonKind::Primary;
        self
    }

    pub fn danger(mut self) -> Self {
        self.kind = ButtonKind::Danger;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show a shortcut in the hover tooltip.
    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Stretch to at least `width`.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(12.0);
        let galley =
            ui.painter()
                .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let text_width = galley.size().x + 20.0;
        let width = self.min_width.map_or(text_width, |w| w.max(text_width));
        let sense = if self.enabled {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(vec2(width, sizing::BUTTON_HEIGHT), sense);

        if ui.is_rect_visible(rect) {
            let hovered = self.enabled && response.hovered();
            let (bg_color, text_color) = match self.kind {
                _ if !self.enabled => (Color32::from_gray(245), Color32::from_gray(180)),
                ButtonKind::Primary if hovered => {
                    (Color32::from_rgb(37, 99, 235), Color32::WHITE)
                }
                ButtonKind::Primary => (theme::ACCENT, Color32::WHITE),
                ButtonKind::Secondary if hovered => (Color32::from_gray(230), theme::TEXT),
                ButtonKind::Secondary => (Color32::from_gray(245), theme::TEXT),
                ButtonKind::Danger if hovered => (theme::DANGER, Color32::WHITE),
                ButtonKind::Danger => (Color32::from_gray(245), theme::DANGER),
            };

            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            ui.painter().rect_filled(rect, radius, bg_color);
            if self.kind != ButtonKind::Primary {
                ui.painter().rect_stroke(
                    rect,
                    radius,
                    Stroke::new(1.0, theme::BORDER),
                    StrokeKind::Inside,
                );
            }
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = self.enabled && response.clicked();
        let response = match &self.shortcut {
            Some(shortcut) => response.on_hover_text(shortcut.as_str()),
            None => response,
        };
        if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand);
        }
        clicked
    }
}

/// A toggle button with text label.
/// Uses solid blue background when selected.
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    min_width: Option<f32>,
    height: f32,
    font_size: f32,
}

impl<'a> ToggleButton<'a> {
    /// Create a new toggle button.
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            min_width: None,
            height: 24.0,
            font_size: 11.0,
        }
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Set the button height.
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(self.font_size);
        let galley =
            ui.painter()
                .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let text_width = galley.size().x;
        let width = self.min_width.unwrap_or(text_width + 16.0).max(text_width + 16.0);
        let (rect, response) = ui.allocate_exact_size(vec2(width, self.height), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                theme::ACCENT
            } else if response.hovered() {
                Color32::from_gray(235)
            } else {
                Color32::from_gray(245)
            };
            let text_color = if self.selected {
                Color32::WHITE
            } else {
                Color32::from_gray(80)
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A font size preset button showing its size in pixels.
pub struct FontSizeButton {
    size_px: f32,
    selected: bool,
}

impl FontSizeButton {
    pub fn new(size_px: f32, selected: bool) -> Self {
        Self { size_px, selected }
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(vec2(30.0, 24.0), Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                theme::ACCENT
            } else if response.hovered() {
                Color32::from_gray(230)
            } else {
                Color32::from_gray(245)
            };
            let text_color = if self.selected {
                Color32::WHITE
            } else {
                Color32::from_gray(60)
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            // Letter scaled with the preset, capped so it fits the button
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                "あ",
                egui::FontId::proportional((self.size_px * 0.8).clamp(9.0, 16.0)),
                text_color,
            );
        }

        let clicked = response.clicked();
        response
            .on_hover_text(format!("{} px", self.size_px as i32))
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}
