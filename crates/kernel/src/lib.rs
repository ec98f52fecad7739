//! Novarch Content Kernel Library
//!
//! Renders rich CMS documents into HTML fragments and maps CMS entries to
//! the public entry shape. The `novarch` binary drives it from the command
//! line.

pub mod config;
pub mod content;
pub mod error;

pub use config::Config;
pub use error::{ContentError, ContentResult};
