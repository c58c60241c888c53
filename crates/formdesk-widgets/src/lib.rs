//! Reusable egui widget components for the Formdesk designer.
//!
//! - **Buttons**: action buttons, toggle buttons, font size presets
//! - **Colors**: CSS color parsing, color swatches, color rows for the property panel
//! - **List**: clickable list rows, panel frames
//! - **Layout**: section labels, separators, labelled property rows
//! - **Palette**: draggable palette items

pub mod buttons;
pub mod colors;
pub mod layout;
pub mod list;
pub mod palette;

pub use buttons::{ActionButton, ButtonKind, FontSizeButton, ToggleButton};
pub use colors::{
    ColorRow, ColorSwatch, FIELD_COLORS, NoColorSwatch, colors_match, parse_css_color, to_css_hex,
};
pub use layout::{property_row, section_label, separator, vertical_separator};
pub use list::{ListItem, panel_frame, toolbar_frame};
pub use palette::PaletteItem;

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Small button size (color swatches)
    pub const SMALL: f32 = 20.0;
    /// Standard button height
    pub const BUTTON_HEIGHT: f32 = 28.0;
    /// Width of the label column in property rows
    pub const LABEL_WIDTH: f32 = 72.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Selection/active color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Destructive actions (red)
    pub const DANGER: Color32 = Color32::from_rgb(239, 68, 68);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(245, 245, 245);
    /// Selected background
    pub const SELECTED_BG: Color32 = Color32::from_rgb(235, 245, 255);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
