//! Template document model: templates, pages, fields and their styles.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a field within a template.
pub type FieldId = String;

/// Default width of a freshly dropped field.
pub const DEFAULT_FIELD_WIDTH: f64 = 200.0;
/// Default height of a freshly dropped field.
pub const DEFAULT_FIELD_HEIGHT: f64 = 40.0;
/// Stacking order given to new fields.
pub const DEFAULT_Z_INDEX: i32 = 1000;
/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;
/// Suffix appended to the label of a pasted field.
pub const COPY_LABEL_SUFFIX: &str = " (コピー)";

/// Generate a new field identifier.
fn generate_field_id() -> FieldId {
    Uuid::new_v4().to_string()
}

/// Kind of input a field represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Checkbox,
    Select,
    Textarea,
    Date,
    Number,
    Calculation,
    Radio,
}

impl FieldType {
    /// All field types in palette order.
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Checkbox,
        FieldType::Select,
        FieldType::Textarea,
        FieldType::Date,
        FieldType::Number,
        FieldType::Calculation,
        FieldType::Radio,
    ];

    /// Human readable label shown in the palette.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "テキスト",
            FieldType::Checkbox => "チェックボックス",
            FieldType::Select => "セレクト",
            FieldType::Textarea => "テキストエリア",
            FieldType::Date => "日付",
            FieldType::Number => "数値",
            FieldType::Calculation => "計算",
            FieldType::Radio => "ラジオボタン",
        }
    }

    /// Wire token, identical to the serialized form.
    pub fn token(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Calculation => "calculation",
            FieldType::Radio => "radio",
        }
    }

    /// Parse a wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.token() == token)
    }

    /// Whether this type carries a list of choices.
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    /// Label given to a freshly created field of this type.
    pub fn default_label(self) -> String {
        format!("新しい{}", self.label())
    }
}

/// Visual style and geometry of a field, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub z_index: i32,
    pub background_color: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

impl Style {
    /// Default style for a field placed at `position`.
    pub fn at(position: Point) -> Self {
        Self {
            left: position.x,
            top: position.y,
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
            font_size: DEFAULT_FONT_SIZE,
            z_index: DEFAULT_Z_INDEX,
            background_color: "#ffffff".to_string(),
            color: "#000000".to_string(),
            border_color: Some("#d1d5db".to_string()),
            font_weight: Some("normal".to_string()),
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bounding box on the canvas.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.size())
    }

    /// Move the top-left corner.
    pub fn set_origin(&mut self, origin: Point) {
        self.left = origin.x;
        self.top = origin.y;
    }

    /// Replace position and size at once.
    pub fn set_bounds(&mut self, origin: Point, size: Size) {
        self.set_origin(origin);
        self.width = size.width;
        self.height = size.height;
    }
}

/// A single form field placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub field_id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Validation rule, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub style: Style,
}

impl Field {
    /// Create a field of `field_type` with its top-left corner at `position`.
    pub fn new(field_type: FieldType, position: Point) -> Self {
        let id = generate_field_id();
        let options = field_type
            .has_options()
            .then(|| vec!["選択肢1".to_string(), "選択肢2".to_string()]);
        Self {
            field_id: id.clone(),
            id,
            field_type,
            label: field_type.default_label(),
            placeholder: None,
            required: Some(false),
            validation: None,
            formula: None,
            options,
            style: Style::at(position),
        }
    }

    /// Copy this field under a fresh identity, shifted by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> Self {
        let id = generate_field_id();
        let mut copy = self.clone();
        copy.field_id = id.clone();
        copy.id = id;
        copy.label = format!("{}{}", self.label, COPY_LABEL_SUFFIX);
        copy.style.set_origin(self.style.origin() + offset);
        copy
    }

    /// Bounding box on the canvas.
    pub fn bounds(&self) -> Rect {
        self.style.rect()
    }

    /// Whether `point` lies inside the field (edges included).
    pub fn contains(&self, point: Point) -> bool {
        let r = self.bounds();
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    }

    /// Merge a partial update into this field.
    pub fn apply_patch(&mut self, patch: &FieldPatch) {
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(placeholder) = &patch.placeholder {
            self.placeholder = non_empty(placeholder);
        }
        if let Some(required) = patch.required {
            self.required = Some(required);
        }
        if let Some(width) = patch.width {
            self.style.width = width;
        }
        if let Some(height) = patch.height {
            self.style.height = height;
        }
        if let Some(font_size) = patch.font_size {
            self.style.font_size = font_size;
        }
        if let Some(font_weight) = &patch.font_weight {
            self.style.font_weight = non_empty(font_weight);
        }
        if let Some(color) = &patch.color {
            self.style.color = color.clone();
        }
        if let Some(border_color) = &patch.border_color {
            self.style.border_color = non_empty(border_color);
        }
        if let Some(background_color) = &patch.background_color {
            self.style.background_color = background_color.clone();
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Partial update of the attributes exposed by the property panel.
///
/// Only the members that are `Some` are written. Empty strings clear the
/// optional attributes (placeholder, font weight, border colour).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub font_weight: Option<String>,
    pub color: Option<String>,
    pub border_color: Option<String>,
    pub background_color: Option<String>,
}

impl FieldPatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == FieldPatch::default()
    }
}

/// One page of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Display number. Not renumbered when earlier pages are deleted.
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Page {
    /// Create an empty page.
    pub fn new(page_number: u32) -> Self {
        Self {
            page_number,
            background_image: None,
            fields: Vec::new(),
        }
    }

    /// Get a field by id.
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Get a mutable field by id.
    pub fn field_mut(&mut self, id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    /// Remove a field by id, returning it.
    pub fn remove_field(&mut self, id: &str) -> Option<Field> {
        let index = self.fields.iter().position(|f| f.id == id)?;
        Some(self.fields.remove(index))
    }

    /// Fields in paint order (back to front).
    ///
    /// Sorted by `zIndex`; fields with equal `zIndex` keep document order.
    pub fn fields_ordered(&self) -> Vec<&Field> {
        let mut fields: Vec<&Field> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.style.z_index);
        fields
    }

    /// Topmost field containing `point`.
    pub fn field_at(&self, point: Point) -> Option<&Field> {
        self.fields_ordered()
            .into_iter()
            .rev()
            .find(|f| f.contains(point))
    }
}

/// Root aggregate: a named, multi-page form template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Default for Template {
    fn default() -> Self {
        Self::new("無題のテンプレート")
    }
}

impl Template {
    /// Create an unsaved template with a single empty page.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            pages: vec![Page::new(1)],
        }
    }

    /// Guarantee at least one page.
    pub fn ensure_page(&mut self) {
        if self.pages.is_empty() {
            self.pages.push(Page::new(1));
        }
    }

    /// Total number of fields across all pages.
    pub fn field_count(&self) -> usize {
        self.pages.iter().map(|p| p.fields.len()).sum()
    }

    /// Listing entry for this template.
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone().unwrap_or_default(),
            name: self.name.clone(),
            description: self.description.clone(),
            page_count: self.pages.len(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Lightweight listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub page_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_template_has_one_page() {
        let template = Template::new("Test");
        assert_eq!(template.pages.len(), 1);
        assert_eq!(template.pages[0].page_number, 1);
        assert!(template.id.is_none());
    }

    #[test]
    fn test_new_field_defaults() {
        let field = Field::new(FieldType::Text, Point::new(100.0, 120.0));
        assert_eq!(field.id, field.field_id);
        assert_eq!(field.label, "新しいテキスト");
        assert_eq!(field.style.left, 100.0);
        assert_eq!(field.style.top, 120.0);
        assert_eq!(field.style.width, 200.0);
        assert_eq!(field.style.height, 40.0);
        assert_eq!(field.style.z_index, 1000);
        assert!(field.options.is_none());
    }

    #[test]
    fn test_choice_fields_get_options() {
        let select = Field::new(FieldType::Select, Point::ZERO);
        let radio = Field::new(FieldType::Radio, Point::ZERO);
        assert_eq!(select.options.as_ref().map(Vec::len), Some(2));
        assert_eq!(radio.options.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_duplicate_gets_new_identity() {
        let mut field = Field::new(FieldType::Number, Point::new(50.0, 50.0));
        field.label = "X".to_string();
        let copy = field.duplicate(Vec2::new(20.0, 20.0));

        assert_ne!(copy.id, field.id);
        assert_ne!(copy.field_id, field.field_id);
        assert_eq!(copy.id, copy.field_id);
        assert_eq!(copy.label, "X (コピー)");
        assert_eq!(copy.style.origin(), Point::new(70.0, 70.0));
        assert_eq!(copy.style.width, field.style.width);
    }

    #[test]
    fn test_field_type_tokens() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::from_token(t.token()), Some(t));
        }
        assert_eq!(FieldType::from_token("signature"), None);
    }

    #[test]
    fn test_json_shape() {
        let mut template = Template::new("Test");
        let field = Field::new(FieldType::Checkbox, Point::new(10.0, 20.0));
        template.pages[0].fields.push(field);

        let value: serde_json::Value =
            serde_json::from_str(&template.to_json().unwrap()).unwrap();
        let field = &value["pages"][0]["fields"][0];
        assert_eq!(value["pages"][0]["pageNumber"], 1);
        assert_eq!(field["type"], "checkbox");
        assert!(field["fieldId"].is_string());
        assert_eq!(field["style"]["zIndex"], 1000);
        assert_eq!(field["style"]["backgroundColor"], "#ffffff");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_from_json_accepts_integer_geometry() {
        let json = r##"{
            "id": "t1",
            "name": "点検表",
            "pages": [{
                "pageNumber": 1,
                "fields": [{
                    "id": "f1", "fieldId": "f1", "type": "date", "label": "点検日",
                    "validation": {"pattern": "\\d+"},
                    "style": {"left": 10, "top": 20, "width": 200, "height": 40,
                              "fontSize": 14, "zIndex": 1000,
                              "backgroundColor": "#fff", "color": "#000"}
                }]
            }]
        }"##;
        let template = Template::from_json(json).unwrap();
        let field = &template.pages[0].fields[0];
        assert_eq!(field.field_type, FieldType::Date);
        assert_eq!(field.style.width, 200.0);
        assert!(field.validation.is_some());
        assert!(field.style.border_color.is_none());
    }

    #[test]
    fn test_ensure_page() {
        let mut template = Template::from_json(r#"{"name":"empty","pages":[]}"#).unwrap();
        template.ensure_page();
        assert_eq!(template.pages.len(), 1);
    }

    #[test]
    fn test_apply_patch_only_touches_present_members() {
        let mut field = Field::new(FieldType::Text, Point::ZERO);
        let before = field.clone();
        field.apply_patch(&FieldPatch {
            label: Some("氏名".to_string()),
            width: Some(320.0),
            border_color: Some(String::new()),
            ..Default::default()
        });

        assert_eq!(field.label, "氏名");
        assert_eq!(field.style.width, 320.0);
        assert_eq!(field.style.border_color, None);
        assert_eq!(field.style.height, before.style.height);
        assert_eq!(field.style.color, before.style.color);
    }

    #[test]
    fn test_field_at_prefers_highest_z_index() {
        let mut page = Page::new(1);
        let mut low = Field::new(FieldType::Text, Point::new(0.0, 0.0));
        low.style.z_index = 2000;
        let high = Field::new(FieldType::Text, Point::new(50.0, 10.0));
        page.fields.push(low.clone());
        page.fields.push(high);

        let hit = page.field_at(Point::new(60.0, 20.0)).unwrap();
        assert_eq!(hit.id, low.id);
    }

    #[test]
    fn test_field_at_later_field_wins_ties() {
        let mut page = Page::new(1);
        let first = Field::new(FieldType::Text, Point::new(0.0, 0.0));
        let second = Field::new(FieldType::Text, Point::new(50.0, 10.0));
        page.fields.push(first);
        page.fields.push(second.clone());

        let hit = page.field_at(Point::new(60.0, 20.0)).unwrap();
        assert_eq!(hit.id, second.id);
        assert!(page.field_at(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_summary() {
        let mut template = Template::new("報告書");
        template.id = Some("abc".to_string());
        template.pages.push(Page::new(2));
        let summary = template.summary();
        assert_eq!(summary.id, "abc");
        assert_eq!(summary.page_count, 2);
    }
}
