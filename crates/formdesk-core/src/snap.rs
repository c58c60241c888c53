//! Grid snapping for field positions and sizes.

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 10.0;

/// Snap mode for aligning fields to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapMode {
    /// No snapping.
    None,
    /// Snap to grid lines.
    #[default]
    Grid,
}

impl SnapMode {
    /// Switch snapping on or off.
    pub fn toggle(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::None,
        }
    }

    /// Check if grid snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self == SnapMode::Grid
    }
}

/// Round a value to the nearest multiple of `grid_size`.
///
/// Ties go toward positive infinity, so -5 snaps to 0 and 5 snaps to 10.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    (value / grid_size + 0.5).floor() * grid_size
}

/// Snap `value` to the grid while keeping it within `[0, max]`.
///
/// When the nearest grid line lies past `max`, the grid line just below it
/// is used instead. `max` itself is expected to be non-negative.
pub fn snap_within(value: f64, max: f64, grid_size: f64) -> f64 {
    let snapped = snap_value(value, grid_size);
    if snapped > max {
        (max / grid_size).floor() * grid_size
    } else if snapped < 0.0 {
        0.0
    } else {
        snapped
    }
}
