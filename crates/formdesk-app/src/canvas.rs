//! The design canvas: paints the current page and feeds egui pointer input
//! into the [`Designer`].

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui,
    Vec2,
};
use formdesk_core::handles::handle_positions;
use formdesk_core::{CursorShape, Designer, Field, FieldType, HANDLE_SIZE};
use formdesk_widgets::{parse_css_color, theme};
use kurbo::Point;

const GRID_COLOR: Color32 = Color32::from_rgb(238, 240, 243);
const DEFAULT_BORDER: Color32 = Color32::from_rgb(0xd1, 0xd5, 0xdb);
const SELECTION_COLOR: Color32 = theme::ACCENT;
const DROP_HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(30, 64, 120, 24);

/// Map a core cursor shape to egui's cursor icon.
pub fn cursor_icon(shape: CursorShape) -> CursorIcon {
    match shape {
        CursorShape::Default => CursorIcon::Default,
        CursorShape::Move => CursorIcon::Move,
        CursorShape::ResizeNs => CursorIcon::ResizeVertical,
        CursorShape::ResizeEw => CursorIcon::ResizeHorizontal,
        CursorShape::ResizeNeSw => CursorIcon::ResizeNeSw,
        CursorShape::ResizeNwSe => CursorIcon::ResizeNwSe,
    }
}

/// Screen position to canvas coordinates.
fn to_canvas(origin: Pos2, pos: Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

/// Canvas rectangle to screen coordinates.
fn to_screen(origin: Pos2, rect: kurbo::Rect) -> Rect {
    Rect::from_min_max(
        Pos2::new(origin.x + rect.x0 as f32, origin.y + rect.y0 as f32),
        Pos2::new(origin.x + rect.x1 as f32, origin.y + rect.y1 as f32),
    )
}

/// Draw the canvas and handle its input.
///
/// `resolve_url` turns a stored background URL into something the image
/// loaders can fetch. With `interactive` false (a modal is open) the canvas
/// is painted but ignores the pointer.
pub fn show(
    ui: &mut Ui,
    designer: &mut Designer,
    resolve_url: &dyn Fn(&str) -> String,
    interactive: bool,
) {
    let size = designer.config().canvas_size;
    let sense = if interactive {
        Sense::click_and_drag()
    } else {
        Sense::hover()
    };
    let (response, painter) =
        ui.allocate_painter(Vec2::new(size.width as f32, size.height as f32), sense);
    let rect = response.rect;
    let origin = rect.min;

    painter.rect_filled(rect, CornerRadius::ZERO, Color32::WHITE);

    if let Some(url) = &designer.current_page().background_image {
        egui::Image::new(resolve_url(url)).paint_at(ui, rect);
    }

    if designer.snap().is_enabled() {
        paint_grid(&painter, rect, designer.config().grid_size as f32);
    }

    for field in designer.current_page().fields_ordered() {
        paint_field(&painter, origin, field);
    }

    if let Some(field) = designer.selected_field() {
        paint_selection(&painter, origin, field);
    }

    painter.rect_stroke(
        rect,
        CornerRadius::ZERO,
        Stroke::new(1.0, theme::BORDER),
        StrokeKind::Outside,
    );

    if !interactive {
        return;
    }

    // Palette drop
    if response.dnd_hover_payload::<FieldType>().is_some() {
        painter.rect_filled(rect, CornerRadius::ZERO, DROP_HIGHLIGHT);
    }
    if let Some(field_type) = response.dnd_release_payload::<FieldType>() {
        if let Some(pos) = response.hover_pos() {
            designer.drop_field(*field_type, to_canvas(origin, pos));
        }
        return;
    }

    let pointer = ui.input(|i| i.pointer.interact_pos());

    if response.drag_started() {
        let press = ui.input(|i| i.pointer.press_origin()).or(pointer);
        if let Some(pos) = press {
            designer.pointer_down(to_canvas(origin, pos));
        }
    }
    if response.dragged()
        && let Some(pos) = pointer
    {
        designer.pointer_move(to_canvas(origin, pos));
    }
    if response.drag_stopped() {
        designer.pointer_up();
    }
    if response.clicked()
        && let Some(pos) = pointer
    {
        designer.pointer_down(to_canvas(origin, pos));
        designer.pointer_up();
    }

    let hover = response.hover_pos().or(if designer.is_manipulating() {
        pointer
    } else {
        None
    });
    if let Some(pos) = hover {
        let shape = designer.hover(to_canvas(origin, pos));
        ui.ctx().set_cursor_icon(cursor_icon(shape));
    }
}

fn paint_grid(painter: &egui::Painter, rect: Rect, grid: f32) {
    if grid <= 1.0 {
        return;
    }
    let stroke = Stroke::new(1.0, GRID_COLOR);
    let mut x = rect.left() + grid;
    while x < rect.right() {
        painter.vline(x, rect.y_range(), stroke);
        x += grid;
    }
    let mut y = rect.top() + grid;
    while y < rect.bottom() {
        painter.hline(rect.x_range(), y, stroke);
        y += grid;
    }
}

fn paint_field(painter: &egui::Painter, origin: Pos2, field: &Field) {
    let style = &field.style;
    let rect = to_screen(origin, field.bounds());
    let radius = CornerRadius::same(2);

    let fill = parse_css_color(&style.background_color).unwrap_or(Color32::WHITE);
    let border = style
        .border_color
        .as_deref()
        .and_then(parse_css_color)
        .unwrap_or(DEFAULT_BORDER);
    let text_color = parse_css_color(&style.color).unwrap_or(Color32::BLACK);

    painter.rect_filled(rect, radius, fill);
    painter.rect_stroke(rect, radius, Stroke::new(1.0, border), StrokeKind::Inside);

    let clip = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    let font = FontId::proportional(style.font_size as f32);
    let mut label = field.label.clone();
    if field.required == Some(true) {
        label.push_str(" *");
    }

    let text_left = rect.left() + 6.0 + decoration_width(field.field_type, rect);
    let anchor = Pos2::new(text_left, rect.center().y);
    clip.text(anchor, Align2::LEFT_CENTER, &label, font.clone(), text_color);
    // The default fonts have no bold face.
    if style.font_weight.as_deref() == Some("bold") {
        clip.text(
            anchor + Vec2::new(0.6, 0.0),
            Align2::LEFT_CENTER,
            &label,
            font,
            text_color,
        );
    }

    if let Some(placeholder) = &field.placeholder {
        clip.text(
            Pos2::new(rect.right() - 6.0, rect.center().y),
            Align2::RIGHT_CENTER,
            placeholder,
            FontId::proportional((style.font_size as f32 * 0.85).max(8.0)),
            theme::TEXT_MUTED,
        );
    }

    paint_decoration(&clip, field.field_type, rect, border);
}

/// Horizontal space taken by the leading type marker.
fn decoration_width(field_type: FieldType, rect: Rect) -> f32 {
    match field_type {
        FieldType::Checkbox | FieldType::Radio => rect.height().min(16.0) + 6.0,
        _ => 0.0,
    }
}

fn paint_decoration(painter: &egui::Painter, field_type: FieldType, rect: Rect, color: Color32) {
    let stroke = Stroke::new(1.0, color.gamma_multiply(1.4));
    let marker = rect.height().min(16.0) - 4.0;
    let lead = Pos2::new(rect.left() + 6.0 + marker / 2.0, rect.center().y);
    let trail = Pos2::new(rect.right() - 12.0, rect.center().y);

    match field_type {
        FieldType::Checkbox => {
            let square = Rect::from_center_size(lead, Vec2::splat(marker));
            painter.rect_stroke(square, CornerRadius::same(2), stroke, StrokeKind::Inside);
        }
        FieldType::Radio => {
            painter.circle_stroke(lead, marker / 2.0, stroke);
        }
        FieldType::Select => {
            painter.text(
                trail,
                Align2::CENTER_CENTER,
                "▼",
                FontId::proportional(9.0),
                theme::TEXT_MUTED,
            );
        }
        FieldType::Date => {
            painter.text(
                trail,
                Align2::CENTER_CENTER,
                "📅",
                FontId::proportional(11.0),
                theme::TEXT_MUTED,
            );
        }
        FieldType::Calculation => {
            painter.text(
                trail,
                Align2::CENTER_CENTER,
                "Σ",
                FontId::proportional(12.0),
                theme::TEXT_MUTED,
            );
        }
        FieldType::Textarea => {
            let corner = rect.right_bottom() - Vec2::splat(3.0);
            for step in [4.0, 8.0] {
                painter.line_segment(
                    [corner - Vec2::new(step, 0.0), corner - Vec2::new(0.0, step)],
                    stroke,
                );
            }
        }
        FieldType::Text | FieldType::Number => {}
    }
}

fn paint_selection(painter: &egui::Painter, origin: Pos2, field: &Field) {
    let rect = to_screen(origin, field.bounds());
    painter.rect_stroke(
        rect,
        CornerRadius::ZERO,
        Stroke::new(1.5, SELECTION_COLOR),
        StrokeKind::Outside,
    );

    let half = HANDLE_SIZE as f32 / 2.0;
    for (_, point) in handle_positions(field.bounds()) {
        let center = Pos2::new(origin.x + point.x as f32, origin.y + point.y as f32);
        let square = Rect::from_center_size(center, Vec2::splat(half * 2.0));
        painter.rect_filled(square, CornerRadius::ZERO, Color32::WHITE);
        painter.rect_stroke(
            square,
            CornerRadius::ZERO,
            Stroke::new(1.0, SELECTION_COLOR),
            StrokeKind::Inside,
        );
    }
}
