//! Rich document model for CMS block content.
//!
//! Documents arrive from the CMS as JSON arrays of blocks, each tagged by a
//! `_type` discriminant. Decoding is lenient: missing optional fields fall
//! back to neutral defaults and unrecognized block types become
//! [`Block::Unknown`] instead of failing the whole document.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ContentResult;

/// Tone used by callouts that do not name one.
pub const DEFAULT_TONE: &str = "default";

/// Title used by ritual steps that do not name one.
pub const DEFAULT_STEP_TITLE: &str = "Step";

/// Block-scoped annotation definitions, keyed by `_key`.
pub type MarkDefs = HashMap<String, MarkDefinition>;

/// An ordered sequence of blocks in reading order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Option<Vec<Block>>")]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Create a document from already-decoded blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Decode a document from a JSON array. `null` yields an empty document.
    pub fn from_json_str(input: &str) -> ContentResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Blocks in reading order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<Option<Vec<Block>>> for Document {
    fn from(blocks: Option<Vec<Block>>) -> Self {
        Self::new(blocks.unwrap_or_default())
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

/// One structural unit of a document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum Block {
    /// `_type: "block"`: paragraph, heading, quote or list item.
    Text(TextBlock),
    /// `_type: "pullQuote"`.
    PullQuote(PullQuote),
    /// `_type: "callout"`.
    Callout(Callout),
    /// `_type: "ritualStep"`.
    RitualStep(RitualStep),
    /// Any other discriminant. Carries nothing renderable.
    Unknown,
}

impl Block {
    /// Decode a single block from its JSON representation.
    ///
    /// Never fails: anything that is not an object with a recognized `_type`
    /// becomes [`Block::Unknown`].
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::Unknown;
        };

        match str_field(fields, "_type") {
            Some("block") => Self::Text(TextBlock::from_fields(fields)),
            Some("pullQuote") => Self::PullQuote(PullQuote {
                text: string_field(fields, "text"),
                attribution: non_empty_field(fields, "attribution"),
            }),
            Some("callout") => Self::Callout(Callout {
                title: non_empty_field(fields, "title"),
                tone: non_empty_field(fields, "tone").unwrap_or_else(|| DEFAULT_TONE.to_string()),
                body: string_field(fields, "body"),
            }),
            Some("ritualStep") => Self::RitualStep(RitualStep {
                title: str_field(fields, "title")
                    .unwrap_or(DEFAULT_STEP_TITLE)
                    .to_string(),
                description: string_field(fields, "description"),
            }),
            _ => Self::Unknown,
        }
    }
}

impl From<Value> for Block {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Block style of a text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextStyle {
    #[default]
    Normal,
    H2,
    H3,
    H4,
    Blockquote,
    /// Any style name this renderer does not know.
    Unknown,
}

impl TextStyle {
    /// Map a CMS style name. A missing style is `Normal`.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None | Some("normal") => Self::Normal,
            Some("h2") => Self::H2,
            Some("h3") => Self::H3,
            Some("h4") => Self::H4,
            Some("blockquote") => Self::Blockquote,
            Some(_) => Self::Unknown,
        }
    }
}

/// List kind of a list-item text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListItem {
    Bullet,
    Number,
}

impl ListItem {
    /// `"bullet"` is a bullet; any other non-empty name is numbered.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" => None,
            "bullet" => Some(Self::Bullet),
            _ => Some(Self::Number),
        }
    }

    /// Any truthy non-string value (e.g. `true`) is numbered.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Self::from_name(name),
            other if is_truthy(other) => Some(Self::Number),
            _ => None,
        }
    }
}

/// A paragraph, heading, quote or list item made of inline spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub style: TextStyle,
    pub list_item: Option<ListItem>,
    pub children: Vec<Span>,
    pub mark_defs: MarkDefs,
}

impl TextBlock {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let children = fields
            .get("children")
            .and_then(Value::as_array)
            .map(|children| children.iter().map(Span::from_value).collect())
            .unwrap_or_default();

        // Later definitions win on duplicate keys.
        let mark_defs = fields
            .get("markDefs")
            .and_then(Value::as_array)
            .map(|defs| {
                defs.iter()
                    .filter_map(MarkDefinition::from_value)
                    .map(|def| (def.key.clone(), def))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            style: TextStyle::from_name(str_field(fields, "style")),
            list_item: fields.get("listItem").and_then(ListItem::from_value),
            children,
            mark_defs,
        }
    }
}

/// A run of text carrying inline marks. The first mark is innermost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub marks: Vec<String>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Add a mark reference on the outside of the existing ones.
    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.marks.push(mark.into());
        self
    }

    fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        let marks = fields
            .get("marks")
            .and_then(Value::as_array)
            .map(|marks| {
                marks
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            text: string_field(fields, "text"),
            marks,
        }
    }
}

/// A block-scoped annotation, such as a link target.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkDefinition {
    pub key: String,
    /// The annotation `_type`, e.g. `"link"`.
    pub kind: String,
    /// Every field other than `_key` and `_type`.
    pub attributes: Map<String, Value>,
}

impl MarkDefinition {
    pub fn new(key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// String value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// Definitions without a string `_key` can never be referenced.
    fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let key = str_field(fields, "_key")?.to_string();
        let kind = string_field(fields, "_type");
        let attributes = fields
            .iter()
            .filter(|(name, _)| !matches!(name.as_str(), "_key" | "_type"))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Some(Self {
            key,
            kind,
            attributes,
        })
    }
}

/// A highlighted quotation with optional attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullQuote {
    pub text: String,
    pub attribution: Option<String>,
}

/// An aside box; `body` may span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callout {
    pub title: Option<String>,
    pub tone: String,
    pub body: String,
}

impl Default for Callout {
    fn default() -> Self {
        Self {
            title: None,
            tone: DEFAULT_TONE.to_string(),
            body: String::new(),
        }
    }
}

/// A titled step of a ritual; `description` may span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RitualStep {
    pub title: String,
    pub description: String,
}

impl Default for RitualStep {
    fn default() -> Self {
        Self {
            title: DEFAULT_STEP_TITLE.to_string(),
            description: String::new(),
        }
    }
}

/// JSON truthiness: null, `false`, zero and empty strings, arrays or
/// objects are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn str_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

fn string_field(fields: &Map<String, Value>, name: &str) -> String {
    str_field(fields, name).unwrap_or("").to_string()
}

fn non_empty_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    str_field(fields, name)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
