//! Draggable palette items.

use egui::{Align2, CornerRadius, CursorIcon, Id, Sense, Stroke, StrokeKind, Ui, vec2};
use std::any::Any;

use crate::{sizing, theme};

/// A palette entry that can be dragged onto a drop target.
///
/// The payload travels through egui's drag-and-drop state; the drop target
/// reads it with `Response::dnd_release_payload`.
pub struct PaletteItem<'a, P> {
    label: &'a str,
    hint: Option<&'a str>,
    payload: P,
}

impl<'a, P: Any + Send + Sync> PaletteItem<'a, P> {
    pub fn new(label: &'a str, payload: P) -> Self {
        Self {
            label,
            hint: None,
            payload,
        }
    }

    /// Small muted text on the right (for example the type token).
    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Show the item. Returns true while it is being dragged.
    pub fn show(self, ui: &mut Ui, id: Id) -> bool {
        let label = self.label;
        let hint = self.hint;
        let dragging = ui.ctx().is_being_dragged(id);

        ui.dnd_drag_source(id, self.payload, |ui| {
            let size = vec2(ui.available_width(), 32.0);
            let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
            if ui.is_rect_visible(rect) {
                let radius = CornerRadius::same(sizing::CORNER_RADIUS);
                let bg = if dragging {
                    theme::SELECTED_BG
                } else if response.hovered() {
                    theme::HOVER_BG
                } else {
                    egui::Color32::WHITE
                };
                ui.painter().rect_filled(rect, radius, bg);
                ui.painter().rect_stroke(
                    rect,
                    radius,
                    Stroke::new(1.0, theme::BORDER),
                    StrokeKind::Inside,
                );
                ui.painter().text(
                    egui::Pos2::new(rect.left() + 10.0, rect.center().y),
                    Align2::LEFT_CENTER,
                    label,
                    egui::FontId::proportional(13.0),
                    theme::TEXT,
                );
                if let Some(hint) = hint {
                    ui.painter().text(
                        egui::Pos2::new(rect.right() - 10.0, rect.center().y),
                        Align2::RIGHT_CENTER,
                        hint,
                        egui::FontId::proportional(10.0),
                        theme::TEXT_MUTED,
                    );
                }
            }
            response.on_hover_cursor(CursorIcon::Grab);
        });

        dragging
    }
}
