//! Pointer and keyboard events delivered to the designer.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only the platform command key held (Ctrl, or ⌘ on macOS).
    pub const COMMAND: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl or ⌘ is held.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => *position,
        }
    }
}

/// A key press with the modifiers held at the time.
///
/// `key` uses the names of the DOM `KeyboardEvent.key` values: letters as
/// typed (`"c"`, `"V"`), and named keys such as `"Delete"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(!Modifiers::NONE.command());
        assert!(Modifiers::COMMAND.command());
        let meta = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert!(meta.command());
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert!(!shift.command());
    }

    #[test]
    fn test_pointer_event_position() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(PointerEvent::Move { position: p }.position(), p);
        assert_eq!(
            PointerEvent::Up {
                position: p,
                button: MouseButton::Left
            }
            .position(),
            p
        );
    }
}
