// src/formatting/mod.rs
//! Renders Notion content: block trees to Markdown and HTML, page
//! properties to plain JSON values.

pub mod block_renderer;
mod html;
mod markdown;
pub mod properties;
pub mod rich_text;

pub use block_renderer::{BlockVisitor, DocumentConverter, ListKind};
pub use html::HtmlVisitor;
pub use markdown::MarkdownVisitor;
pub use properties::{document_title, extract_properties};
