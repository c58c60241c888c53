//! Resize handles on a field's border.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Distance from an edge, in pixels, within which the pointer grabs a handle.
pub const HANDLE_THRESHOLD: f64 = 8.0;

/// Side length of the square drawn for each handle.
pub const HANDLE_SIZE: f64 = 8.0;

/// One of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "se")]
    SouthEast,
    #[serde(rename = "sw")]
    SouthWest,
}

impl ResizeHandle {
    /// All handles, corners first.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::SouthEast,
        ResizeHandle::North,
        ResizeHandle::South,
        ResizeHandle::West,
        ResizeHandle::East,
    ];

    /// Short compass code (`"n"`, `"se"`, ...).
    pub fn code(self) -> &'static str {
        match self {
            ResizeHandle::North => "n",
            ResizeHandle::South => "s",
            ResizeHandle::East => "e",
            ResizeHandle::West => "w",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::SouthEast => "se",
            ResizeHandle::SouthWest => "sw",
        }
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::NorthEast
                | ResizeHandle::NorthWest
                | ResizeHandle::SouthEast
                | ResizeHandle::SouthWest
        )
    }

    /// Dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::North | ResizeHandle::NorthEast | ResizeHandle::NorthWest
        )
    }

    /// Dragging this handle moves the bottom edge.
    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::South | ResizeHandle::SouthEast | ResizeHandle::SouthWest
        )
    }

    /// Dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest
        )
    }

    /// Dragging this handle moves the right edge.
    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast
        )
    }

    /// Anchor point of this handle on `rect`.
    pub fn position_on(self, rect: Rect) -> Point {
        let center = rect.center();
        let x = if self.moves_left() {
            rect.x0
        } else if self.moves_right() {
            rect.x1
        } else {
            center.x
        };
        let y = if self.moves_top() {
            rect.y0
        } else if self.moves_bottom() {
            rect.y1
        } else {
            center.y
        };
        Point::new(x, y)
    }

    /// Cursor to show while hovering or dragging this handle.
    pub fn cursor(self) -> CursorShape {
        match self {
            ResizeHandle::North | ResizeHandle::South => CursorShape::ResizeNs,
            ResizeHandle::East | ResizeHandle::West => CursorShape::ResizeEw,
            ResizeHandle::NorthEast | ResizeHandle::SouthWest => CursorShape::ResizeNeSw,
            ResizeHandle::NorthWest | ResizeHandle::SouthEast => CursorShape::ResizeNwSe,
        }
    }
}

/// Pointer cursor feedback for the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    /// Over a field body, or dragging one.
    Move,
    ResizeNs,
    ResizeEw,
    ResizeNeSw,
    ResizeNwSe,
}

/// Find the handle under a pointer given in field-local coordinates.
///
/// `local` is the pointer minus the field's top-left corner. Corners win over
/// edges: a point near both the top and the left edge is `NorthWest`, never
/// `North` or `West`.
pub fn hit_test(local: Point, size: Size, threshold: f64) -> Option<ResizeHandle> {
    let (x, y) = (local.x, local.y);
    let (w, h) = (size.width, size.height);
    if x < -threshold || y < -threshold || x > w + threshold || y > h + threshold {
        return None;
    }

    let near_left = x <= threshold;
    let near_right = x >= w - threshold;
    let near_top = y <= threshold;
    let near_bottom = y >= h - threshold;

    if near_top && near_left {
        Some(ResizeHandle::NorthWest)
    } else if near_top && near_right {
        Some(ResizeHandle::NorthEast)
    } else if near_bottom && near_left {
        Some(ResizeHandle::SouthWest)
    } else if near_bottom && near_right {
        Some(ResizeHandle::SouthEast)
    } else if near_top {
        Some(ResizeHandle::North)
    } else if near_bottom {
        Some(ResizeHandle::South)
    } else if near_left {
        Some(ResizeHandle::West)
    } else if near_right {
        Some(ResizeHandle::East)
    } else {
        None
    }
}

/// Find the handle under a canvas-space `point` for a field occupying `rect`.
pub fn hit_test_rect(rect: Rect, point: Point, threshold: f64) -> Option<ResizeHandle> {
    let local = Point::new(point.x - rect.x0, point.y - rect.y0);
    hit_test(local, rect.size(), threshold)
}

/// Anchor points of all eight handles, for drawing.
pub fn handle_positions(rect: Rect) -> [(ResizeHandle, Point); 8] {
    ResizeHandle::ALL.map(|handle| (handle, handle.position_on(rect)))
}
