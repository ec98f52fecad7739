//! Content module.
//!
//! This module provides:
//! - Document model: typed blocks decoded leniently from CMS JSON
//! - FilterPipeline: escaping and line-break handling for plain text
//! - Mark resolution for inline formatting and annotations
//! - Block rendering: documents to HTML fragments, with list grouping
//! - Entry mapping: CMS query results to public API entries

pub mod block_render;
pub mod block_types;
pub mod entry;
mod filter;
pub mod marks;

pub use block_render::{ListState, ListTag, RenderedBlock, render_block, render_document};
pub use block_types::{Block, Document};
pub use entry::{CmsEntry, PublicEntry, QueryResponse};
pub use filter::{FilterPipeline, TextFilter, html_escape};
