//! Formdesk Core Library
//!
//! Platform-agnostic document model and interaction logic for the Formdesk
//! form-template designer.

pub mod api;
pub mod designer;
pub mod handles;
pub mod input;
pub mod manipulation;
pub mod session;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod template;

pub use api::{ApiError, ApiResult, LocalTemplateApi, TemplateApi, UploadResponse};
pub use designer::{
    CANVAS_HEIGHT, CANVAS_WIDTH, Designer, DesignerConfig, DesignerError, PressOutcome,
    ShortcutOutcome,
};
pub use handles::{CursorShape, HANDLE_SIZE, HANDLE_THRESHOLD, ResizeHandle};
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use manipulation::{Gesture, MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use snap::{GRID_SIZE, SnapMode};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use template::{Field, FieldId, FieldPatch, FieldType, Page, Style, Template, TemplateSummary};
