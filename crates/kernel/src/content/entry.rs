//! CMS entry mapping.
//!
//! Entries come back from the headless CMS wrapped in a query response
//! (`{ "result": ... }`). Their `body` is a rich document, which is rendered
//! to HTML here so the public API can serve it directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::block_render::render_document;
use super::block_types::{Document, is_truthy};
use crate::error::{ContentError, ContentResult};

/// Entry record as returned by the CMS query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CmsEntry {
    /// CMS document ID.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    /// URL slug (projected from `slug.current`).
    #[serde(default)]
    pub slug: Option<String>,

    /// Category slug (projected from the referenced category).
    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    /// Rich document body. `null` is an empty document.
    #[serde(default)]
    pub body: Document,

    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "_updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CmsEntry {
    /// Render the body and convert to the public shape.
    pub fn into_public(self) -> ContentResult<PublicEntry> {
        let title = self.title.ok_or(ContentError::MissingField("title"))?;
        let slug = self.slug.ok_or(ContentError::MissingField("slug"))?;
        let content_html = render_document(&self.body);

        Ok(PublicEntry {
            id: self.id,
            title,
            subtitle: self.subtitle,
            slug,
            category: self.category,
            summary: self.summary,
            content_html,
            created_at: self.created_at,
            updated_at: self.updated_at,
            published_at: self.published_at,
        })
    }
}

/// Entry as served by the read-only content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicEntry {
    pub id: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub slug: String,
    pub category: Option<String>,
    pub summary: Option<String>,
    /// Rendered body fragment.
    pub content_html: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// A CMS query response envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    result: Value,
}

impl QueryResponse {
    /// Parse a raw response body. Anything but an object has no result.
    pub fn from_json_str(input: &str) -> ContentResult<Self> {
        let payload: Value = serde_json::from_str(input)?;
        Ok(Self::from_value(payload))
    }

    pub fn from_value(payload: Value) -> Self {
        let result = match payload {
            Value::Object(mut fields) => fields.remove("result").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        Self { result }
    }

    /// Map a list query. A missing or non-array result is an empty list.
    pub fn entries(&self) -> ContentResult<Vec<PublicEntry>> {
        let Some(items) = self.result.as_array() else {
            return Ok(Vec::new());
        };
        items.iter().map(map_entry).collect()
    }

    /// Map a single-entry query. A missing or falsy result (null, `[]`,
    /// `{}`, `""`, `false`, `0`) is `None`.
    pub fn entry(&self) -> ContentResult<Option<PublicEntry>> {
        if !is_truthy(&self.result) {
            return Ok(None);
        }
        map_entry(&self.result).map(Some)
    }
}

fn map_entry(item: &Value) -> ContentResult<PublicEntry> {
    let id = item.get("_id").and_then(Value::as_str).unwrap_or("<none>");
    CmsEntry::deserialize(item)
        .map_err(ContentError::from)
        .and_then(CmsEntry::into_public)
        .inspect_err(|e| warn!(entry = %id, error = %e, "failed to map CMS entry"))
}
