//! The document side of the folio pipeline.
//!
//! - [`DocumentContent`] is the JSON content model.
//! - [`DocumentSource`] renders it into a [`SourceDocument`] with page-number
//!   placeholders in its table of contents.
//! - [`merge`] and [`inject_page_numbers`] fill those placeholders in for the
//!   final render.

pub mod content;
pub mod document;
pub mod error;
pub mod ids;
pub mod inject;
pub mod inline;
pub mod merge;
pub mod node;

pub use self::content::{Block, DocumentContent, SectionContent};
pub use self::document::{DocumentSource, SourceDocument, SourceOptions};
pub use self::error::SourceError;
pub use self::inject::{Injection, inject_page_numbers};
pub use self::inline::{InlineRenderer, MarkupInline, PlainInline};
pub use self::merge::merge;
