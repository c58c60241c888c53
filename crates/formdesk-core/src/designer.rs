//! Editing session over a template: pointer gestures, selection, clipboard,
//! page navigation and property edits.
//!
//! The [`Designer`] owns the template. Everything the UI shows is read back
//! from it, and every interaction goes through one of its methods.

use crate::handles::{self, CursorShape, HANDLE_SIZE, HANDLE_THRESHOLD, ResizeHandle};
use crate::input::{KeyEvent, MouseButton, PointerEvent};
use crate::manipulation::{DragState, Gesture, ResizeState, drag_position, resize_bounds};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::snap::{GRID_SIZE, SnapMode};
use crate::template::{Field, FieldId, FieldPatch, FieldType, Page, Template};
use kurbo::{Point, Rect, Size, Vec2};
use thiserror::Error;

/// Width of the canvas: A4 at 96 dpi.
pub const CANVAS_WIDTH: f64 = 794.0;
/// Height of the canvas: A4 at 96 dpi.
pub const CANVAS_HEIGHT: f64 = 1123.0;

/// Errors reported by designer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DesignerError {
    #[error("最後のページは削除できません")]
    LastPage,
    #[error("field not found: {0}")]
    FieldNotFound(FieldId),
}

/// Tunables of the editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignerConfig {
    pub canvas_size: Size,
    pub grid_size: f64,
    pub handle_threshold: f64,
    /// Shift applied to a pasted field relative to the clipboard copy.
    pub paste_offset: Vec2,
    /// Initial snap mode.
    pub snap: SnapMode,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            canvas_size: Size::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            grid_size: GRID_SIZE,
            handle_threshold: HANDLE_THRESHOLD,
            paste_offset: Vec2::new(20.0, 20.0),
            snap: SnapMode::Grid,
        }
    }
}

/// How a pointer press was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// A field was grabbed for moving.
    Drag,
    /// A field was grabbed by one of its handles.
    Resize(ResizeHandle),
    /// Empty canvas was clicked; the selection was cleared.
    Canvas,
    /// A gesture was already running.
    Ignored,
}

/// Result of a keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// The model handled the shortcut.
    Applied,
    /// The shell should persist the template.
    SaveRequested,
    /// Nothing to do (no selection, empty clipboard, unbound key).
    Ignored,
}

/// Editing session for one template.
#[derive(Debug, Clone)]
pub struct Designer {
    template: Template,
    current_page: usize,
    selected: Option<FieldId>,
    clipboard: Option<Field>,
    gesture: Option<Gesture>,
    hovered_handle: Option<ResizeHandle>,
    snap: SnapMode,
    config: DesignerConfig,
    dirty: bool,
}

impl Default for Designer {
    fn default() -> Self {
        Self::new(DesignerConfig::default())
    }
}

impl Designer {
    /// Start a session on a new, unsaved template.
    pub fn new(config: DesignerConfig) -> Self {
        Self::with_template(Template::default(), config)
    }

    /// Start a session on an existing template.
    pub fn with_template(mut template: Template, config: DesignerConfig) -> Self {
        template.ensure_page();
        Self {
            template,
            current_page: 0,
            selected: None,
            clipboard: None,
            gesture: None,
            hovered_handle: None,
            snap: config.snap,
            config,
            dirty: false,
        }
    }

    // --- accessors ---

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Record the id assigned by the backend on first save.
    pub fn set_template_id(&mut self, id: impl Into<String>) {
        self.template.id = Some(id.into());
    }

    /// Whether there are edits that have not been saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.template.pages.len()
    }

    pub fn current_page(&self) -> &Page {
        &self.template.pages[self.current_page]
    }

    fn current_page_mut(&mut self) -> &mut Page {
        &mut self.template.pages[self.current_page]
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected field, read from the current page.
    pub fn selected_field(&self) -> Option<&Field> {
        let id = self.selected.as_deref()?;
        self.current_page().field(id)
    }

    pub fn clipboard(&self) -> Option<&Field> {
        self.clipboard.as_ref()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_manipulating(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn hovered_handle(&self) -> Option<ResizeHandle> {
        self.hovered_handle
    }

    pub fn snap(&self) -> SnapMode {
        self.snap
    }

    pub fn toggle_snap(&mut self) {
        self.snap = self.snap.toggle();
        log::debug!("Grid snap {:?}", self.snap);
    }

    // --- drag-create ---

    /// Create a field of `field_type` with its top-left corner at `point`.
    pub fn drop_field(&mut self, field_type: FieldType, point: Point) -> FieldId {
        let field = Field::new(field_type, point);
        let id = field.id.clone();
        log::debug!("Created {} field {} at {:?}", field_type.token(), id, point);
        self.current_page_mut().fields.push(field);
        self.selected = Some(id.clone());
        self.dirty = true;
        id
    }

    /// Create a field from a palette drag payload. Unknown types are ignored.
    pub fn drop_token(&mut self, token: &str, point: Point) -> Option<FieldId> {
        match FieldType::from_token(token) {
            Some(field_type) => Some(self.drop_field(field_type, point)),
            None => {
                log::warn!("Ignoring drop of unknown field type {token:?}");
                None
            }
        }
    }

    // --- pointer gestures ---

    /// Handle a primary-button press on the canvas.
    pub fn pointer_down(&mut self, point: Point) -> PressOutcome {
        if self.gesture.is_some() {
            return PressOutcome::Ignored;
        }

        // Handle squares of the selected field stick out past its border.
        let grabbed = self.selected_field().and_then(|field| {
            handle_square_at(field.bounds(), point).map(|handle| (field.id.clone(), handle))
        });
        if let Some((id, handle)) = grabbed {
            self.begin_resize(&id, handle, point);
            return PressOutcome::Resize(handle);
        }

        let threshold = self.config.handle_threshold;
        let Some(field) = self.current_page().field_at(point) else {
            self.clear_selection();
            return PressOutcome::Canvas;
        };
        let id = field.id.clone();
        let bounds = field.bounds();

        match handles::hit_test_rect(bounds, point, threshold) {
            Some(handle) => {
                self.begin_resize(&id, handle, point);
                PressOutcome::Resize(handle)
            }
            None => {
                log::debug!("Begin drag of {id}");
                self.selected = Some(id.clone());
                self.gesture = Some(Gesture::Drag(DragState {
                    field_id: id,
                    offset: point - bounds.origin(),
                }));
                PressOutcome::Drag
            }
        }
    }

    /// Start resizing `field_id` from `handle`.
    ///
    /// Returns false when the field is not on the current page or another
    /// gesture is running.
    pub fn begin_resize(&mut self, field_id: &str, handle: ResizeHandle, point: Point) -> bool {
        if self.gesture.is_some() {
            return false;
        }
        let Some(field) = self.current_page().field(field_id) else {
            return false;
        };
        log::debug!("Begin {} resize of {field_id}", handle.code());
        self.gesture = Some(Gesture::Resize(ResizeState {
            field_id: field_id.to_string(),
            handle,
            start_point: point,
            start_rect: field.bounds(),
        }));
        self.selected = Some(field_id.to_string());
        true
    }

    /// Apply the active gesture for a pointer at `point`.
    ///
    /// Returns whether the template changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Some(gesture) = &self.gesture else {
            return false;
        };
        let snap = self.snap;
        let grid = self.config.grid_size;
        let canvas = self.config.canvas_size;
        let page = &mut self.template.pages[self.current_page];

        let Some(field) = page.field_mut(gesture.field_id()) else {
            log::warn!("Field {} vanished during a gesture", gesture.field_id());
            self.gesture = None;
            return false;
        };

        let before = field.bounds();
        match gesture {
            Gesture::Drag(drag) => {
                let origin = drag_position(point, drag.offset, before.size(), canvas, snap, grid);
                field.style.set_origin(origin);
            }
            Gesture::Resize(resize) => {
                let (origin, size) =
                    resize_bounds(resize.start_rect, resize.handle, resize.delta(point), snap, grid);
                field.style.set_bounds(origin, size);
            }
        }

        let changed = field.bounds() != before;
        self.dirty |= changed;
        changed
    }

    /// End the active gesture. Returns whether one was running.
    pub fn pointer_up(&mut self) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                log::debug!("End gesture on {}", gesture.field_id());
                true
            }
            None => false,
        }
    }

    /// Dispatch a raw pointer event. Only the left button starts gestures.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position) != PressOutcome::Ignored,
            PointerEvent::Down { .. } => false,
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            } => self.pointer_up(),
            PointerEvent::Up { .. } => false,
        }
    }

    /// Cursor feedback for a pointer at `point`.
    ///
    /// During a gesture the gesture's cursor is kept. The template is never
    /// modified here.
    pub fn hover(&mut self, point: Point) -> CursorShape {
        if let Some(gesture) = &self.gesture {
            return gesture.cursor();
        }

        let selected_handle = self
            .selected_field()
            .and_then(|field| handle_square_at(field.bounds(), point));
        let (handle, cursor) = match selected_handle {
            Some(handle) => (Some(handle), handle.cursor()),
            None => match self.current_page().field_at(point) {
                Some(field) => {
                    match handles::hit_test_rect(field.bounds(), point, self.config.handle_threshold)
                    {
                        Some(handle) => (Some(handle), handle.cursor()),
                        None => (None, CursorShape::Move),
                    }
                }
                None => (None, CursorShape::Default),
            },
        };
        self.hovered_handle = handle;
        cursor
    }

    // --- selection and clipboard ---

    /// Select a field on the current page. Returns false if there is none.
    pub fn select(&mut self, id: &str) -> bool {
        if self.current_page().field(id).is_none() {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Copy the selected field to the clipboard.
    pub fn copy(&mut self) -> bool {
        match self.selected_field().cloned() {
            Some(field) => {
                log::debug!("Copied field {}", field.id);
                self.clipboard = Some(field);
                true
            }
            None => false,
        }
    }

    /// Paste a duplicate of the clipboard onto the current page and select it.
    ///
    /// The offset is applied to the clipboard copy, not to the previous
    /// paste, so repeated pastes land on the same spot.
    pub fn paste(&mut self) -> Option<FieldId> {
        let copy = self.clipboard.as_ref()?.duplicate(self.config.paste_offset);
        let id = copy.id.clone();
        log::debug!("Pasted field {id}");
        self.current_page_mut().fields.push(copy);
        self.selected = Some(id.clone());
        self.dirty = true;
        Some(id)
    }

    /// Delete the selected field.
    pub fn delete_selected(&mut self) -> bool {
        match self.selected.clone() {
            Some(id) => self.delete_field(&id),
            None => false,
        }
    }

    /// Delete a field from the current page.
    pub fn delete_field(&mut self, id: &str) -> bool {
        if self.current_page_mut().remove_field(id).is_none() {
            return false;
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if self.gesture.as_ref().is_some_and(|g| g.field_id() == id) {
            self.gesture = None;
        }
        log::debug!("Deleted field {id}");
        self.dirty = true;
        true
    }

    // --- keyboard ---

    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> ShortcutOutcome {
        let applied = match action {
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Paste => self.paste().is_some(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Save => return ShortcutOutcome::SaveRequested,
        };
        if applied {
            ShortcutOutcome::Applied
        } else {
            ShortcutOutcome::Ignored
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> ShortcutOutcome {
        match ShortcutRegistry::resolve(&event.key, event.modifiers) {
            Some(action) => self.apply_shortcut(action),
            None => ShortcutOutcome::Ignored,
        }
    }

    // --- pages ---

    /// Append an empty page and switch to it. Returns its index.
    pub fn add_page(&mut self) -> usize {
        let page_number = self.template.pages.len() as u32 + 1;
        self.template.pages.push(Page::new(page_number));
        self.dirty = true;
        let index = self.template.pages.len() - 1;
        log::info!("Added page {page_number}");
        self.switch_page(index);
        index
    }

    /// Delete the current page and move to the previous one.
    ///
    /// The last remaining page cannot be deleted. Page numbers of the
    /// remaining pages are left as they are.
    pub fn delete_page(&mut self) -> Result<(), DesignerError> {
        if self.template.pages.len() <= 1 {
            log::warn!("Refusing to delete the last page");
            return Err(DesignerError::LastPage);
        }
        let removed = self.template.pages.remove(self.current_page);
        log::info!("Deleted page {}", removed.page_number);
        self.dirty = true;
        self.gesture = None;
        self.selected = None;
        self.current_page = self.current_page.saturating_sub(1);
        Ok(())
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    /// Switch to page `index`, clamped to the existing pages.
    pub fn go_to_page(&mut self, index: usize) {
        let last = self.template.pages.len().saturating_sub(1);
        self.switch_page(index.min(last));
    }

    fn switch_page(&mut self, index: usize) {
        if index == self.current_page {
            return;
        }
        self.current_page = index;
        self.selected = None;
        self.gesture = None;
        self.hovered_handle = None;
    }

    /// Set or clear the background image of the current page.
    pub fn set_page_background(&mut self, url: Option<String>) {
        self.current_page_mut().background_image = url;
        self.dirty = true;
    }

    // --- properties ---

    /// Merge `patch` into the selected field. Returns false with no selection.
    pub fn update_selected(&mut self, patch: &FieldPatch) -> bool {
        match self.selected.clone() {
            Some(id) => self.update_field(&id, patch).is_ok(),
            None => false,
        }
    }

    /// Merge `patch` into a field of the current page.
    pub fn update_field(&mut self, id: &str, patch: &FieldPatch) -> Result<(), DesignerError> {
        let field = self
            .current_page_mut()
            .field_mut(id)
            .ok_or_else(|| DesignerError::FieldNotFound(id.to_string()))?;
        field.apply_patch(patch);
        if !patch.is_empty() {
            self.dirty = true;
        }
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.template.name = name.into();
        self.dirty = true;
    }

    /// Set the description; an empty string clears it.
    pub fn set_description(&mut self, description: &str) {
        self.template.description = (!description.is_empty()).then(|| description.to_string());
        self.dirty = true;
    }
}

/// Handle whose drawn square contains `point`.
fn handle_square_at(rect: Rect, point: Point) -> Option<ResizeHandle> {
    let square = Size::new(HANDLE_SIZE, HANDLE_SIZE);
    handles::handle_positions(rect)
        .into_iter()
        .find(|(_, center)| Rect::from_center_size(*center, square).contains(point))
        .map(|(handle, _)| handle)
}
