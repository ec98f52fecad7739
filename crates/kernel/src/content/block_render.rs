//! Server-side rendering of CMS rich documents into an HTML fragment.
//!
//! Converts a [`Document`] into semantic HTML:
//! - Text blocks become paragraphs, headings, quotes or list items
//! - Adjacent list items of the same kind share one `<ul>`/`<ol>` container
//! - Pull quotes, callouts and ritual steps get their own markup
//!
//! Rendering is pure and infallible. Unknown block types are skipped.

use std::sync::LazyLock;

use tracing::{debug, trace};

use super::block_types::{
    Block, Callout, Document, ListItem, PullQuote, RitualStep, TextBlock, TextStyle,
};
use super::filter::FilterPipeline;
use super::marks::render_marks;

/// Rendered in place of an empty text block so it keeps its height.
pub const EMPTY_BLOCK_PLACEHOLDER: &str = "&nbsp;";

static PLAIN_TEXT: LazyLock<FilterPipeline> = LazyLock::new(FilterPipeline::plain_text);
static MULTILINE: LazyLock<FilterPipeline> = LazyLock::new(FilterPipeline::multiline);

/// List container element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTag {
    Ul,
    Ol,
}

impl ListTag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ul => "ul",
            Self::Ol => "ol",
        }
    }
}

impl From<ListItem> for ListTag {
    fn from(item: ListItem) -> Self {
        match item {
            ListItem::Bullet => Self::Ul,
            ListItem::Number => Self::Ol,
        }
    }
}

/// One block's HTML plus the list container it needs, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub list: Option<ListTag>,
    pub html: String,
}

impl RenderedBlock {
    fn standalone(html: String) -> Self {
        Self { list: None, html }
    }
}

/// Open-list state threaded through document rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListState {
    #[default]
    NoList,
    InList(ListTag),
}

impl ListState {
    /// Emit whatever container tags must precede a block needing `list`,
    /// and return the state after it.
    pub fn advance(self, list: Option<ListTag>, out: &mut String) -> Self {
        match (self, list) {
            (Self::InList(open), Some(tag)) if open == tag => self,
            (_, Some(tag)) => {
                self.finish(out);
                out.push('<');
                out.push_str(tag.name());
                out.push('>');
                Self::InList(tag)
            }
            (_, None) => {
                self.finish(out);
                Self::NoList
            }
        }
    }

    /// Close the open container, if any.
    pub fn finish(self, out: &mut String) {
        if let Self::InList(tag) = self {
            out.push_str("</");
            out.push_str(tag.name());
            out.push('>');
        }
    }
}

/// Render a document into a single HTML fragment.
pub fn render_document(document: &Document) -> String {
    render_blocks(document.blocks())
}

/// Render blocks in order, grouping list runs into containers.
///
/// An unknown block leaves any open list untouched, so list items on either
/// side of it still share a container.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut html = String::new();
    let state = blocks
        .iter()
        .fold(ListState::NoList, |state, block| match render_block(block) {
            Some(rendered) => {
                let next = state.advance(rendered.list, &mut html);
                html.push_str(&rendered.html);
                next
            }
            None => {
                trace!("skipping unknown block");
                state
            }
        });
    state.finish(&mut html);

    debug!(blocks = blocks.len(), bytes = html.len(), "rendered document");
    html
}

/// Render a single block. Returns `None` for [`Block::Unknown`].
pub fn render_block(block: &Block) -> Option<RenderedBlock> {
    let rendered = match block {
        Block::Text(text) => render_text_block(text),
        Block::PullQuote(quote) => RenderedBlock::standalone(render_pull_quote(quote)),
        Block::Callout(callout) => RenderedBlock::standalone(render_callout(callout)),
        Block::RitualStep(step) => RenderedBlock::standalone(render_ritual_step(step)),
        Block::Unknown => return None,
    };
    Some(rendered)
}

/// Concatenate a text block's spans, or the placeholder if that is empty.
pub fn render_children(block: &TextBlock) -> String {
    let html: String = block
        .children
        .iter()
        .map(|span| render_marks(&span.text, &span.marks, &block.mark_defs))
        .collect();
    if html.is_empty() {
        EMPTY_BLOCK_PLACEHOLDER.to_string()
    } else {
        html
    }
}

// ---------------------------------------------------------------------------
// Individual block renderers
// ---------------------------------------------------------------------------

fn render_text_block(block: &TextBlock) -> RenderedBlock {
    let inner = render_children(block);
    if let Some(item) = block.list_item {
        return RenderedBlock {
            list: Some(item.into()),
            html: format!("<li>{inner}</li>"),
        };
    }

    let tag = match block.style {
        TextStyle::Normal | TextStyle::Unknown => "p",
        TextStyle::H2 => "h2",
        TextStyle::H3 => "h3",
        TextStyle::H4 => "h4",
        TextStyle::Blockquote => "blockquote",
    };
    RenderedBlock::standalone(format!("<{tag}>{inner}</{tag}>"))
}

fn render_pull_quote(quote: &PullQuote) -> String {
    let text = PLAIN_TEXT.process(&quote.text);
    let cite = quote
        .attribution
        .as_deref()
        .map(|attribution| format!("<cite>{}</cite>", PLAIN_TEXT.process(attribution)))
        .unwrap_or_default();
    format!("<blockquote class=\"pull-quote\"><p>{text}</p>{cite}</blockquote>")
}

fn render_callout(callout: &Callout) -> String {
    let tone = PLAIN_TEXT.process(&callout.tone);
    let title = callout
        .title
        .as_deref()
        .map(|title| format!("<p class=\"callout__title\">{}</p>", PLAIN_TEXT.process(title)))
        .unwrap_or_default();
    let body = MULTILINE.process(&callout.body);
    format!("<aside class=\"callout callout--{tone}\">{title}<p>{body}</p></aside>")
}

fn render_ritual_step(step: &RitualStep) -> String {
    let title = PLAIN_TEXT.process(&step.title);
    let description = MULTILINE.process(&step.description);
    format!("<section class=\"ritual-step\"><h4>{title}</h4><p>{description}</p></section>")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn render(blocks: Value) -> String {
        let document: Document = serde_json::from_value(blocks).unwrap();
        render_document(&document)
    }

    fn text(style: &str, content: &str) -> Value {
        json!({
            "_type": "block",
            "style": style,
            "children": [{ "_type": "span", "text": content, "marks": [] }],
            "markDefs": []
        })
    }

    fn item(kind: &str, content: &str) -> Value {
        json!({
            "_type": "block",
            "style": "normal",
            "listItem": kind,
            "children": [{ "_type": "span", "text": content }]
        })
    }

    // -- ListState transitions ------------------------------------------

    #[test]
    fn list_state_transition_table() {
        use ListState::{InList, NoList};
        use ListTag::{Ol, Ul};

        let cases = [
            (NoList, None, NoList, ""),
            (NoList, Some(Ul), InList(Ul), "<ul>"),
            (NoList, Some(Ol), InList(Ol), "<ol>"),
            (InList(Ul), Some(Ul), InList(Ul), ""),
            (InList(Ul), Some(Ol), InList(Ol), "</ul><ol>"),
            (InList(Ol), Some(Ul), InList(Ul), "</ol><ul>"),
            (InList(Ol), None, NoList, "</ol>"),
        ];
        for (state, list, expected_state, expected_out) in cases {
            let mut out = String::new();
            let next = state.advance(list, &mut out);
            assert_eq!(next, expected_state, "{state:?} + {list:?}");
            assert_eq!(out, expected_out, "{state:?} + {list:?}");
        }
    }

    #[test]
    fn list_state_finish() {
        let mut out = String::new();
        ListState::NoList.finish(&mut out);
        assert_eq!(out, "");
        ListState::InList(ListTag::Ol).finish(&mut out);
        assert_eq!(out, "</ol>");
    }

    // -- Text blocks ----------------------------------------------------

    #[test]
    fn render_paragraph_block() {
        assert_eq!(render(json!([text("normal", "Hello, world!")])), "<p>Hello, world!</p>");
    }

    #[test]
    fn render_styles() {
        let html = render(json!([
            text("h2", "a"),
            text("h3", "b"),
            text("h4", "c"),
            text("blockquote", "d"),
            text("h1", "e"),
        ]));
        assert_eq!(
            html,
            "<h2>a</h2><h3>b</h3><h4>c</h4><blockquote>d</blockquote><p>e</p>"
        );
    }

    #[test]
    fn missing_style_is_paragraph() {
        let html = render(json!([{ "_type": "block", "children": [{ "text": "x" }] }]));
        assert_eq!(html, "<p>x</p>");
    }

    #[test]
    fn spans_concatenate_without_separator() {
        let html = render(json!([{
            "_type": "block",
            "children": [
                { "text": "Plain " },
                { "text": "bold", "marks": ["strong"] },
                { "text": " and ", "marks": [] },
                { "text": "linked", "marks": ["l1", "em"] }
            ],
            "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://novarch.example" }]
        }]));
        assert_eq!(
            html,
            "<p>Plain <strong>bold</strong> and <em><a href=\"https://novarch.example\" \
             target=\"_blank\" rel=\"noopener noreferrer\">linked</a></em></p>"
        );
    }

    #[test]
    fn mark_defs_are_block_scoped() {
        let html = render(json!([
            {
                "_type": "block",
                "children": [{ "text": "first", "marks": ["l1"] }],
                "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://a" }]
            },
            {
                "_type": "block",
                "children": [{ "text": "second", "marks": ["l1"] }]
            }
        ]));
        assert!(html.ends_with("<p>second</p>"), "got: {html}");
    }

    #[test]
    fn empty_text_block_uses_placeholder() {
        assert_eq!(render(json!([{ "_type": "block" }])), "<p>&nbsp;</p>");
        assert_eq!(
            render(json!([{ "_type": "block", "style": "h2", "children": [{ "text": "" }, {}] }])),
            "<h2>&nbsp;</h2>"
        );
        assert_eq!(
            render(json!([{ "_type": "block", "listItem": "bullet", "children": [] }])),
            "<ul><li>&nbsp;</li></ul>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let html = render(json!([text("normal", "<script>alert('xss')</script>")]));
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;</p>"
        );
    }

    // -- Lists ----------------------------------------------------------

    #[test]
    fn adjacent_bullets_share_one_list() {
        let html = render(json!([item("bullet", "one"), item("bullet", "two")]));
        assert_eq!(html, "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn switching_list_kind_closes_previous_list() {
        let html = render(json!([
            item("bullet", "a"),
            item("number", "b"),
            text("normal", "c"),
        ]));
        assert_eq!(html, "<ul><li>a</li></ul><ol><li>b</li></ol><p>c</p>");
    }

    #[test]
    fn non_list_block_splits_lists() {
        let html = render(json!([
            item("number", "1"),
            { "_type": "callout", "body": "between" },
            item("number", "2"),
        ]));
        assert_eq!(
            html,
            "<ol><li>1</li></ol>\
             <aside class=\"callout callout--default\"><p>between</p></aside>\
             <ol><li>2</li></ol>"
        );
    }

    #[test]
    fn list_at_end_is_closed() {
        let html = render(json!([text("h2", "List"), item("number", "x")]));
        assert_eq!(html, "<h2>List</h2><ol><li>x</li></ol>");
    }

    #[test]
    fn unknown_block_keeps_list_open() {
        let html = render(json!([
            item("bullet", "a"),
            { "_type": "image", "asset": { "_ref": "image-1" } },
            item("bullet", "b"),
        ]));
        assert_eq!(html, "<ul><li>a</li><li>b</li></ul>");
    }

    // -- Special blocks -------------------------------------------------

    #[test]
    fn render_pull_quote_with_attribution() {
        let html = render(json!([{
            "_type": "pullQuote",
            "text": "To be or not to be.",
            "attribution": "Shakespeare & co"
        }]));
        assert_eq!(
            html,
            "<blockquote class=\"pull-quote\"><p>To be or not to be.</p>\
             <cite>Shakespeare &amp; co</cite></blockquote>"
        );
    }

    #[test]
    fn render_pull_quote_without_attribution() {
        let html = render(json!([{ "_type": "pullQuote", "text": "Just a quote." }]));
        assert_eq!(
            html,
            "<blockquote class=\"pull-quote\"><p>Just a quote.</p></blockquote>"
        );
    }

    #[test]
    fn render_callout_with_title() {
        let html = render(json!([{
            "_type": "callout",
            "title": "Note",
            "body": "line1\nline2"
        }]));
        assert_eq!(
            html,
            "<aside class=\"callout callout--default\"><p class=\"callout__title\">Note</p>\
             <p>line1<br>line2</p></aside>"
        );
    }

    #[test]
    fn render_callout_tone_and_empty_body() {
        let html = render(json!([{ "_type": "callout", "tone": "warning" }]));
        assert_eq!(html, "<aside class=\"callout callout--warning\"><p></p></aside>");
    }

    #[test]
    fn callout_tone_is_escaped() {
        let html = render(json!([{ "_type": "callout", "tone": "x\" onclick=\"y" }]));
        assert!(html.starts_with("<aside class=\"callout callout--x&quot; onclick=&quot;y\">"));
    }

    #[test]
    fn render_ritual_step() {
        let html = render(json!([{
            "_type": "ritualStep",
            "title": "Light the candle",
            "description": "Strike the match.\n\nHold it <steady>."
        }]));
        assert_eq!(
            html,
            "<section class=\"ritual-step\"><h4>Light the candle</h4>\
             <p>Strike the match.<br>Hold it &lt;steady&gt;.</p></section>"
        );
    }

    #[test]
    fn callout_body_splits_on_unicode_line_boundaries() {
        let document =
            Document::from_json_str(r#"[{"_type":"callout","body":"a\u2028b\u000bc\u0085d"}]"#)
                .unwrap();
        assert_eq!(
            render_document(&document),
            "<aside class=\"callout callout--default\"><p>a<br>b<br>c<br>d</p></aside>"
        );
    }

    #[test]
    fn render_ritual_step_default_title() {
        let html = render(json!([{ "_type": "ritualStep" }]));
        assert_eq!(html, "<section class=\"ritual-step\"><h4>Step</h4><p></p></section>");
    }

    // -- Documents ------------------------------------------------------

    #[test]
    fn empty_document_renders_empty_string() {
        assert_eq!(render(json!([])), "");
        assert_eq!(render(Value::Null), "");
    }

    #[test]
    fn unknown_only_document_renders_empty_string() {
        assert_eq!(render(json!([{ "_type": "unknown_widget" }])), "");
    }

    #[test]
    fn render_block_reports_list_tag() {
        let block = Block::from_value(&item("number", "x"));
        assert_eq!(
            render_block(&block),
            Some(RenderedBlock {
                list: Some(ListTag::Ol),
                html: "<li>x</li>".to_string(),
            })
        );
        assert_eq!(render_block(&Block::Unknown), None);
    }

    #[test]
    fn rendering_is_deterministic() {
        let blocks = json!([
            item("bullet", "a"),
            {
                "_type": "block",
                "children": [{ "text": "t", "marks": ["a", "b", "strong"] }],
                "markDefs": [
                    { "_key": "a", "_type": "link", "href": "https://a" },
                    { "_key": "b", "_type": "link", "href": "https://b" }
                ]
            },
            { "_type": "callout", "title": "T", "body": "b" }
        ]);
        let first = render(blocks.clone());
        for _ in 0..10 {
            assert_eq!(render(blocks.clone()), first);
        }
    }
}
