//! Layout helpers: separators, section labels, property rows.

use egui::{Color32, Stroke, Ui};

use crate::{sizing, theme};

/// Draw a horizontal separator line.
pub fn separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let y = rect.top() + 4.0;
    ui.painter().line_segment(
        [
            egui::Pos2::new(rect.left(), y),
            egui::Pos2::new(rect.right(), y),
        ],
        Stroke::new(1.0, Color32::from_gray(230)),
    );
    ui.add_space(8.0);
}

/// Draw a vertical separator line (small height).
pub fn vertical_separator(ui: &mut Ui) {
    let rect = ui.available_rect_before_wrap();
    let height = 14.0;
    let x = rect.left() + 1.0;
    let top = rect.center().y - height / 2.0;
    ui.painter().line_segment(
        [egui::Pos2::new(x, top), egui::Pos2::new(x, top + height)],
        Stroke::new(1.0, Color32::from_gray(210)),
    );
    ui.add_space(3.0);
}

/// Draw a section label (small, muted text).
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(10.0).color(theme::TEXT_MUTED));
}

/// A row with a fixed-width label column followed by `add_contents`.
pub fn property_row<R>(ui: &mut Ui, label: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(sizing::LABEL_WIDTH, sizing::SMALL),
            egui::Sense::hover(),
        );
        ui.painter().text(
            egui::Pos2::new(rect.left(), rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(12.0),
            theme::TEXT,
        );
        add_contents(ui)
    })
    .inner
}
