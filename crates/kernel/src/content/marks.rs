//! Inline mark resolution.
//!
//! Each mark reference on a span resolves, at lookup time, to one of a fixed
//! set of behaviors. The resolved marks are then folded over the escaped
//! text so the first mark ends up innermost and the last outermost.

use super::block_types::{MarkDefinition, MarkDefs};
use super::filter::html_escape;

/// A resolved mark reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mark<'a> {
    Strong,
    Em,
    Code,
    /// A block-scoped definition from `markDefs`.
    Annotation(&'a MarkDefinition),
    /// Reference matched nothing. Text passes through.
    NoOp,
}

impl<'a> Mark<'a> {
    /// Resolve a reference. Built-ins shadow `markDefs` keys of the same name.
    pub fn resolve(reference: &str, mark_defs: &'a MarkDefs) -> Self {
        match reference {
            "strong" => Self::Strong,
            "em" => Self::Em,
            "code" => Self::Code,
            key => mark_defs
                .get(key)
                .map(Self::Annotation)
                .unwrap_or(Self::NoOp),
        }
    }

    /// Wrap already-rendered HTML in this mark.
    pub fn wrap(&self, inner: String) -> String {
        match self {
            Self::Strong => format!("<strong>{inner}</strong>"),
            Self::Em => format!("<em>{inner}</em>"),
            Self::Code => format!("<code>{inner}</code>"),
            Self::Annotation(definition) => wrap_annotation(definition, inner),
            Self::NoOp => inner,
        }
    }
}

/// Only links have markup; other annotation types render their text as-is.
fn wrap_annotation(definition: &MarkDefinition, inner: String) -> String {
    match definition.kind.as_str() {
        "link" => {
            // No scheme allow-list: the href is escaped, not validated.
            let href = html_escape(definition.attribute("href").unwrap_or("#"));
            format!("<a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\">{inner}</a>")
        }
        _ => inner,
    }
}

/// Escape `text` once and wrap it in each of `marks`, in order.
pub fn render_marks(text: &str, marks: &[String], mark_defs: &MarkDefs) -> String {
    marks
        .iter()
        .map(|reference| Mark::resolve(reference, mark_defs))
        .fold(html_escape(text), |html, mark| mark.wrap(html))
}
