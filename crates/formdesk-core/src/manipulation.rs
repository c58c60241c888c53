//! Drag and resize state plus the geometry applied on every pointer move.

use crate::handles::{CursorShape, ResizeHandle};
use crate::snap::{SnapMode, snap_value, snap_within};
use crate::template::FieldId;
use kurbo::{Point, Rect, Size, Vec2};

/// Smallest width a resize may produce.
pub const MIN_FIELD_WIDTH: f64 = 50.0;
/// Smallest height a resize may produce.
pub const MIN_FIELD_HEIGHT: f64 = 20.0;

/// State of an active move operation.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// The field being moved.
    pub field_id: FieldId,
    /// Pointer offset from the field's top-left corner at press time.
    pub offset: Vec2,
}

/// State of an active resize operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    /// The field being resized.
    pub field_id: FieldId,
    /// The handle being dragged.
    pub handle: ResizeHandle,
    /// Pointer position at press time.
    pub start_point: Point,
    /// Field bounds at press time.
    pub start_rect: Rect,
}

impl ResizeState {
    /// Pointer delta since the press.
    pub fn delta(&self, point: Point) -> Vec2 {
        point - self.start_point
    }
}

/// The single pointer gesture that can be in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Drag(DragState),
    Resize(ResizeState),
}

impl Gesture {
    /// The field this gesture manipulates.
    pub fn field_id(&self) -> &str {
        match self {
            Gesture::Drag(drag) => &drag.field_id,
            Gesture::Resize(resize) => &resize.field_id,
        }
    }

    /// Cursor to keep while the gesture lasts.
    pub fn cursor(&self) -> CursorShape {
        match self {
            Gesture::Drag(_) => CursorShape::Move,
            Gesture::Resize(resize) => resize.handle.cursor(),
        }
    }
}

/// New top-left corner of a dragged field.
///
/// The position is clamped so the whole field stays on the canvas, then
/// snapped to the grid without leaving that range. A field larger than the
/// canvas is pinned to the origin.
pub fn drag_position(
    pointer: Point,
    offset: Vec2,
    size: Size,
    canvas: Size,
    snap: SnapMode,
    grid_size: f64,
) -> Point {
    let raw = pointer - offset;
    let max_left = (canvas.width - size.width).max(0.0);
    let max_top = (canvas.height - size.height).max(0.0);
    let left = raw.x.clamp(0.0, max_left);
    let top = raw.y.clamp(0.0, max_top);

    if snap.is_enabled() {
        Point::new(
            snap_within(left, max_left, grid_size),
            snap_within(top, max_top, grid_size),
        )
    } else {
        Point::new(left, top)
    }
}

/// New bounds of a field being resized from `handle`.
///
/// `start` is the field's bounds when the resize began and `delta` the
/// pointer movement since then. Width and height never drop below
/// [`MIN_FIELD_WIDTH`] / [`MIN_FIELD_HEIGHT`]; handles on the left or top
/// edge shift the origin by whatever the size changed so the opposite edge
/// stays put. The canvas bounds are not enforced here.
pub fn resize_bounds(
    start: Rect,
    handle: ResizeHandle,
    delta: Vec2,
    snap: SnapMode,
    grid_size: f64,
) -> (Point, Size) {
    let (start_w, start_h) = (start.width(), start.height());
    let mut left = start.x0;
    let mut top = start.y0;
    let mut width = start_w;
    let mut height = start_h;

    if handle.moves_right() {
        width = (start_w + delta.x).max(MIN_FIELD_WIDTH);
    }
    if handle.moves_left() {
        width = (start_w - delta.x).max(MIN_FIELD_WIDTH);
        left = start.x0 + (start_w - width);
    }
    if handle.moves_bottom() {
        height = (start_h + delta.y).max(MIN_FIELD_HEIGHT);
    }
    if handle.moves_top() {
        height = (start_h - delta.y).max(MIN_FIELD_HEIGHT);
        top = start.y0 + (start_h - height);
    }

    if snap.is_enabled() {
        left = snap_value(left, grid_size);
        top = snap_value(top, grid_size);
        width = snap_value(width, grid_size);
        height = snap_value(height, grid_size);
    }

    (Point::new(left, top), Size::new(width, height))
}
