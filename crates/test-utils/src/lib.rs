//! Novarch test utilities.
//!
//! Fixture builders that produce CMS-shaped JSON: rich document blocks,
//! entries and query responses.

use serde_json::{Value as JsonValue, json};

/// Start a paragraph block.
pub fn paragraph() -> TestTextBlock {
    TestTextBlock::new("normal")
}

/// Start a text block with the given style (e.g. "h2", "blockquote").
pub fn styled(style: &str) -> TestTextBlock {
    TestTextBlock::new(style)
}

/// Start a bullet list item.
pub fn bullet_item() -> TestTextBlock {
    TestTextBlock::new("normal").list_item("bullet")
}

/// Start a numbered list item.
pub fn number_item() -> TestTextBlock {
    TestTextBlock::new("normal").list_item("number")
}

/// A text block builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestTextBlock {
    pub style: String,
    pub list_item: Option<String>,
    pub children: Vec<JsonValue>,
    pub mark_defs: Vec<JsonValue>,
}

impl TestTextBlock {
    fn new(style: &str) -> Self {
        Self {
            style: style.to_string(),
            list_item: None,
            children: Vec::new(),
            mark_defs: Vec::new(),
        }
    }

    /// Set the list kind.
    pub fn list_item(mut self, kind: &str) -> Self {
        self.list_item = Some(kind.to_string());
        self
    }

    /// Append an unmarked span.
    pub fn span(self, text: &str) -> Self {
        self.marked_span(text, &[])
    }

    /// Append a span with marks, first innermost.
    pub fn marked_span(mut self, text: &str, marks: &[&str]) -> Self {
        let key = format!("s{}", self.children.len());
        self.children.push(json!({
            "_type": "span",
            "_key": key,
            "text": text,
            "marks": marks,
        }));
        self
    }

    /// Add a link annotation definition.
    pub fn link(mut self, key: &str, href: &str) -> Self {
        self.mark_defs
            .push(json!({ "_key": key, "_type": "link", "href": href }));
        self
    }

    /// Add an arbitrary annotation definition.
    pub fn mark_def(mut self, definition: JsonValue) -> Self {
        self.mark_defs.push(definition);
        self
    }

    /// Build the block JSON.
    pub fn build(self) -> JsonValue {
        let mut block = json!({
            "_type": "block",
            "style": self.style,
            "children": self.children,
            "markDefs": self.mark_defs,
        });
        if let Some(kind) = self.list_item {
            block["listItem"] = JsonValue::String(kind);
        }
        block
    }
}

/// Build a pull quote block.
pub fn pull_quote(text: &str, attribution: Option<&str>) -> JsonValue {
    json!({ "_type": "pullQuote", "text": text, "attribution": attribution })
}

/// Build a callout block. `None` fields are omitted.
pub fn callout(title: Option<&str>, tone: Option<&str>, body: &str) -> JsonValue {
    let mut block = json!({ "_type": "callout", "body": body });
    if let Some(title) = title {
        block["title"] = json!(title);
    }
    if let Some(tone) = tone {
        block["tone"] = json!(tone);
    }
    block
}

/// Build a ritual step block. A `None` title is omitted.
pub fn ritual_step(title: Option<&str>, description: &str) -> JsonValue {
    let mut block = json!({ "_type": "ritualStep", "description": description });
    if let Some(title) = title {
        block["title"] = json!(title);
    }
    block
}

/// Build a block with a type no renderer knows.
pub fn unknown_block(block_type: &str) -> JsonValue {
    json!({ "_type": block_type, "_key": "unknown" })
}

/// Create a test entry with default values.
pub fn test_entry(title: &str, slug: &str) -> TestEntry {
    TestEntry {
        id: format!("entry-{slug}"),
        title: Some(title.to_string()),
        slug: Some(slug.to_string()),
        category: None,
        summary: None,
        body: Vec::new(),
        published_at: Some("2024-01-01T00:00:00Z".to_string()),
    }
}

/// A CMS entry builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestEntry {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub summary: Option<String>,
    pub body: Vec<JsonValue>,
    pub published_at: Option<String>,
}

impl TestEntry {
    /// Set the category slug.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    /// Append a body block.
    pub fn with_block(mut self, block: JsonValue) -> Self {
        self.body.push(block);
        self
    }

    /// Drop the title.
    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Build the entry JSON as projected by the CMS query.
    pub fn build(self) -> JsonValue {
        json!({
            "_id": self.id,
            "title": self.title,
            "subtitle": null,
            "slug": self.slug,
            "category": self.category,
            "summary": self.summary,
            "body": self.body,
            "publishedAt": self.published_at,
            "_createdAt": "2023-12-31T08:00:00Z",
            "_updatedAt": "2024-01-02T08:00:00Z",
        })
    }
}

/// Wrap a result in a CMS query response envelope.
pub fn query_response(result: JsonValue) -> JsonValue {
    json!({ "ms": 3, "query": "*[_type == \"novarchEntry\"]", "result": result })
}
