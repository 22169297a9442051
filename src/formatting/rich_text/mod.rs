// src/formatting/rich_text/mod.rs
//! Formats arrays of rich text runs into Markdown or HTML.

mod annotations;

pub use annotations::{attribute_escape, html_escape, HtmlStyleRenderer, MarkdownStyleRenderer};

use crate::types::RichTextItem;

/// Formats an array of RichTextItems into Markdown.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    items
        .iter()
        .map(|item| {
            MarkdownStyleRenderer::apply_styles(
                &item.plain_text,
                &item.annotations,
                item.href.as_deref(),
            )
        })
        .collect()
}

/// Formats an array of RichTextItems into escaped HTML.
pub fn rich_text_to_html(items: &[RichTextItem]) -> String {
    items
        .iter()
        .map(|item| {
            HtmlStyleRenderer::apply_styles(&item.plain_text, &item.annotations, item.href.as_deref())
        })
        .collect()
}
