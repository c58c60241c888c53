//! Color components: CSS color parsing, swatches and property-panel color rows.

use egui::{
    Color32, CornerRadius, CursorIcon, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2, vec2,
};

use crate::{sizing, theme};

/// Preset colors offered for field text, fill and border, as `(name, css)`.
pub const FIELD_COLORS: &[(&str, &str)] = &[
    ("白", "#ffffff"),
    ("グレー 50", "#f9fafb"),
    ("グレー 300", "#d1d5db"),
    ("グレー 500", "#6b7280"),
    ("黒", "#000000"),
    ("青", "#3b82f6"),
    ("赤", "#ef4444"),
    ("黄", "#fef3c7"),
    ("緑", "#22c55e"),
];

/// Parse a `#rgb` or `#rrggbb` CSS color.
pub fn parse_css_color(color: &str) -> Option<Color32> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Format a color as lowercase `#rrggbb`.
pub fn to_css_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Compare colors ignoring alpha.
pub fn colors_match(a: Color32, b: Color32) -> bool {
    a.r() == b.r() && a.g() == b.g() && a.b() == b.b()
}

/// A rounded square color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    size: Vec2,
}

impl<'a> ColorSwatch<'a> {
    /// Create a new color swatch.
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            size: vec2(sizing::SMALL, sizing::SMALL),
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            ui.painter().rect_filled(rect, radius, self.color);
            // Light colors need an outline to be visible on the panel
            ui.painter().rect_stroke(
                rect,
                radius,
                Stroke::new(1.0, theme::BORDER),
                StrokeKind::Inside,
            );
            if self.selected {
                ui.painter().rect_stroke(
                    rect.expand(2.0),
                    radius,
                    Stroke::new(2.0, theme::ACCENT),
                    StrokeKind::Inside,
                );
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// Swatch standing for "no color" (clears an optional color).
pub struct NoColorSwatch<'a> {
    tooltip: &'a str,
    selected: bool,
}

impl<'a> NoColorSwatch<'a> {
    /// Create a new "no color" swatch.
    pub fn new(tooltip: &'a str) -> Self {
        Self {
            tooltip,
            selected: false,
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Show the swatch and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(sizing::SMALL, sizing::SMALL);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            ui.painter().rect_filled(rect, radius, Color32::WHITE);
            ui.painter().rect_stroke(
                rect,
                radius,
                Stroke::new(1.0, Color32::from_gray(200)),
                StrokeKind::Inside,
            );

            // Red diagonal line
            let inset = rect.shrink(4.0);
            ui.painter().line_segment(
                [
                    Pos2::new(inset.left(), inset.bottom()),
                    Pos2::new(inset.right(), inset.top()),
                ],
                Stroke::new(2.0, theme::DANGER),
            );

            if self.selected {
                ui.painter().rect_stroke(
                    rect.expand(2.0),
                    radius,
                    Stroke::new(2.0, theme::ACCENT),
                    StrokeKind::Inside,
                );
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// Preset swatches plus a custom picker for one CSS color attribute.
///
/// `current` is the attribute's CSS value, `None` when unset. With
/// [`ColorRow::optional`] a "no color" swatch is offered that yields an
/// empty string.
pub struct ColorRow<'a> {
    current: Option<&'a str>,
    optional: bool,
}

impl<'a> ColorRow<'a> {
    pub fn new(current: Option<&'a str>) -> Self {
        Self {
            current,
            optional: false,
        }
    }

    /// Allow clearing the color.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Show the row. Returns the new CSS value when the user picked one.
    pub fn show(self, ui: &mut Ui) -> Option<String> {
        let current = self.current.and_then(parse_css_color);
        let mut picked = None;

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = vec2(4.0, 4.0);
            if self.optional
                && NoColorSwatch::new("なし")
                    .selected(self.current.is_none_or(str::is_empty))
                    .show(ui)
            {
                picked = Some(String::new());
            }

            for (name, css) in FIELD_COLORS {
                let Some(color) = parse_css_color(css) else {
                    continue;
                };
                let selected = current.is_some_and(|c| colors_match(c, color));
                let (clicked, _) = ColorSwatch::new(color, name).selected(selected).show(ui);
                if clicked {
                    picked = Some((*css).to_string());
                }
            }

            let mut custom = current.unwrap_or(Color32::WHITE);
            if egui::color_picker::color_edit_button_srgba(
                ui,
                &mut custom,
                egui::color_picker::Alpha::Opaque,
            )
            .changed()
            {
                picked = Some(to_css_hex(custom));
            }
        });

        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(
            parse_css_color("#d1d5db"),
            Some(Color32::from_rgb(0xd1, 0xd5, 0xdb))
        );
        assert_eq!(parse_css_color("#fff"), Some(Color32::WHITE));
        assert_eq!(parse_css_color(" #000000 "), Some(Color32::BLACK));
    }

    #[test]
    fn test_parse_rejects_other_syntax() {
        assert_eq!(parse_css_color("red"), None);
        assert_eq!(parse_css_color("#12345"), None);
        assert_eq!(parse_css_color("#gggggg"), None);
        assert_eq!(parse_css_color("#ああ"), None);
        assert_eq!(parse_css_color(""), None);
    }

    #[test]
    fn test_hex_round_trip() {
        for (_, css) in FIELD_COLORS {
            let color = parse_css_color(css).unwrap();
            assert_eq!(&to_css_hex(color), css);
        }
    }
}
