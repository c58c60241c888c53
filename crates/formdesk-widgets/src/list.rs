//! Clickable list rows and the panel frames around them.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Frame, Margin, Pos2, Sense, Stroke, Ui, vec2,
};

use crate::{sizing, theme};

/// A clickable row with a title, an optional right-aligned detail and an
/// optional second line.
pub struct ListItem<'a> {
    title: &'a str,
    detail: Option<&'a str>,
    subtitle: Option<&'a str>,
}

impl<'a> ListItem<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            detail: None,
            subtitle: None,
        }
    }

    /// Muted text on the right, e.g. a page count.
    pub fn detail(mut self, detail: &'a str) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Second line under the title. Empty strings are ignored.
    pub fn subtitle(mut self, subtitle: Option<&'a str>) -> Self {
        self.subtitle = subtitle.filter(|s| !s.is_empty());
        self
    }

    /// Show the row. Returns true when clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let height = if self.subtitle.is_some() { 44.0 } else { 28.0 };
        let size = vec2(ui.available_width().max(180.0), height);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            if response.hovered() {
                let radius = CornerRadius::same(sizing::CORNER_RADIUS);
                painter.rect_filled(rect, radius, theme::HOVER_BG);
            }

            let title_y = match self.subtitle {
                Some(_) => rect.top() + 14.0,
                None => rect.center().y,
            };
            painter.text(
                Pos2::new(rect.left() + 12.0, title_y),
                Align2::LEFT_CENTER,
                self.title,
                FontId::proportional(13.0),
                theme::TEXT,
            );
            if let Some(subtitle) = self.subtitle {
                painter.text(
                    Pos2::new(rect.left() + 12.0, rect.bottom() - 13.0),
                    Align2::LEFT_CENTER,
                    subtitle,
                    FontId::proportional(11.0),
                    theme::TEXT_MUTED,
                );
            }
            if let Some(detail) = self.detail {
                painter.text(
                    Pos2::new(rect.right() - 12.0, title_y),
                    Align2::RIGHT_CENTER,
                    detail,
                    FontId::proportional(12.0),
                    theme::TEXT_MUTED,
                );
            }
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// Frame of the side panel contents (palette, property panel).
pub fn panel_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 8,
            offset: [0, 2],
            color: Color32::from_black_alpha(15),
        })
        .inner_margin(Margin::same(10))
}

/// Top bar frame.
pub fn toolbar_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .stroke(Stroke::new(1.0, theme::BORDER))
        .inner_margin(Margin::symmetric(12, 6))
}
