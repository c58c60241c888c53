//! Keyboard shortcut registry.

use crate::input::Modifiers;

/// Editor command bound to a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Copy,
    Paste,
    Save,
    Delete,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Requires Ctrl (or ⌘ on macOS).
    pub command: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.command == modifiers.command()
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("C", true, ShortcutAction::Copy, "選択中のフィールドをコピー"),
            Shortcut::new("V", true, ShortcutAction::Paste, "フィールドを貼り付け"),
            Shortcut::new("S", true, ShortcutAction::Save, "テンプレートを保存"),
            Shortcut::new("Delete", false, ShortcutAction::Delete, "選択中のフィールドを削除"),
        ]
    }

    /// Action bound to `key` with `modifiers`, if any.
    ///
    /// Letter keys match case-insensitively. Extra modifiers such as Shift
    /// do not prevent a match.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.action)
    }

    /// Shortcut bound to `action`, for labelling buttons.
    pub fn for_action(action: ShortcutAction) -> Option<Shortcut> {
        Self::all().into_iter().find(|s| s.action == action)
    }
}
